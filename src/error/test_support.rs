use super::TargetError;

impl From<&'static str> for TargetError {
    fn from(message: &'static str) -> Self {
        TargetError::TestExpectation { message }
    }
}

impl From<String> for TargetError {
    fn from(value: String) -> Self {
        TargetError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}
