mod app;
mod entry;
mod logger;
mod shutdown_handlers;

use sqlvolley::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
