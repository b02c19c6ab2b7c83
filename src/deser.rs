use serde::{de::DeserializeOwned, Serialize};

#[derive(Debug, PartialEq)]
pub struct SerializationError;

#[derive(Debug, PartialEq)]
pub struct DeserializationError;

pub type SerializationResult = Result<serde_json::Value, SerializationError>;
pub type DeserializationResult = Result<(), DeserializationError>;

pub fn serialize<T: Serialize>(value: T) -> SerializationResult {
    serde_json::to_value(value).map_err(|_| SerializationError)
}

pub fn deser_field<T: DeserializeOwned>(
    source: &serde_json::Value,
    field_name: &str,
    callback: impl FnOnce(T),
) -> Result<(), DeserializationError> {
    if let Some(val) = source.get(field_name) {
        let val: T = serde_json::from_value::<T>(val.clone()).map_err(|_| DeserializationError)?;
        callback(val);
        Ok(())
    } else {
        Err(DeserializationError)
    }
}

pub fn deser_field_opt<T: DeserializeOwned>(
    source: &serde_json::Value,
    field_name: &str,
    callback: impl FnOnce(T),
) -> Result<(), DeserializationError> {
    if let Some(val) = source.get(field_name) {
        let val: T = serde_json::from_value(val.clone()).map_err(|_| DeserializationError)?;
        callback(val);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deser_fields() {
        let source = serde_json::json!({ "name": "Direct", "count": 3 });

        let mut name = String::new();
        assert_eq!(deser_field(&source, "name", |v: String| name = v), Ok(()));
        assert_eq!(name, "Direct");

        assert_eq!(
            deser_field(&source, "missing", |_: String| {}),
            Err(DeserializationError)
        );
        assert_eq!(deser_field_opt(&source, "missing", |_: String| {}), Ok(()));

        assert_eq!(
            deser_field(&source, "count", |_: String| {}),
            Err(DeserializationError)
        );
    }
}
