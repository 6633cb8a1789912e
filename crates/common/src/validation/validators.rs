// Field Validators - Reusable validation components

/// Trait for field validators
pub trait FieldValidator<T: ?Sized> {
    /// Validate a field value
    fn validate(&self, value: &T) -> Result<(), String>;
}

/// Accepts only one of a fixed set of string values
#[derive(Debug, Clone)]
pub struct OneOfValidator {
    allowed: Vec<String>,
}

impl OneOfValidator {
    /// Create a validator accepting exactly the given values
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { allowed: allowed.into_iter().map(Into::into).collect() }
    }
}

impl FieldValidator<str> for OneOfValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if self.allowed.iter().any(|candidate| candidate == value) {
            Ok(())
        } else {
            Err(format!("must be one of {}", self.allowed.join(", ")))
        }
    }
}

/// URL validator accepting absolute `http` and `https` URLs
#[derive(Debug, Clone, Default)]
pub struct UrlValidator;

impl UrlValidator {
    const ALLOWED_SCHEMES: [&'static str; 2] = ["http", "https"];

    /// Create a new URL validator
    pub fn new() -> Self {
        Self
    }
}

impl FieldValidator<str> for UrlValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        let parsed = url::Url::parse(value).map_err(|_| "Invalid URL format".to_string())?;
        let scheme = parsed.scheme();

        if !Self::ALLOWED_SCHEMES.contains(&scheme) {
            return Err(format!("URL scheme '{}' is not allowed", scheme));
        }

        Ok(())
    }
}
