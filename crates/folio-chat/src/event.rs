//! Payload carried in the data field of each chat stream event

use serde::Deserialize;

use crate::error::Result;

#[derive(Deserialize, Debug)]
struct WirePayload {
    event: String,
    #[serde(default)]
    data: Option<String>,
}

/// Decoded chat stream payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Incremental text fragment. May be empty when the server omits `data`.
    Data(String),
    /// Normal end of the reply
    End,
    /// Reserved discriminator this client does not understand
    Other(String),
}

impl ServerEvent {
    /// Parse the JSON body of one `message` event.
    pub fn parse(raw: &str) -> Result<Self> {
        let payload: WirePayload = serde_json::from_str(raw)?;
        Ok(match payload.event.as_str() {
            "data" => ServerEvent::Data(payload.data.unwrap_or_default()),
            "end" => ServerEvent::End,
            _ => ServerEvent::Other(payload.event),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data() {
        let event = ServerEvent::parse(r#"{"event":"data","data":"Hello"}"#).unwrap();
        assert_eq!(event, ServerEvent::Data("Hello".to_string()));
    }

    #[test]
    fn test_parse_end_ignores_data() {
        assert_eq!(ServerEvent::parse(r#"{"event":"end"}"#).unwrap(), ServerEvent::End);
        assert_eq!(
            ServerEvent::parse(r#"{"event":"end","data":"ignored"}"#).unwrap(),
            ServerEvent::End
        );
    }

    #[test]
    fn test_parse_missing_and_null_data() {
        assert_eq!(
            ServerEvent::parse(r#"{"event":"data"}"#).unwrap(),
            ServerEvent::Data(String::new())
        );
        assert_eq!(
            ServerEvent::parse(r#"{"event":"data","data":null}"#).unwrap(),
            ServerEvent::Data(String::new())
        );
    }

    #[test]
    fn test_parse_unknown_discriminator() {
        assert_eq!(
            ServerEvent::parse(r#"{"event":"tool","data":"x"}"#).unwrap(),
            ServerEvent::Other("tool".to_string())
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert!(ServerEvent::parse("not json").is_err());
        assert!(ServerEvent::parse(r#"{"data":"no discriminator"}"#).is_err());
        assert!(ServerEvent::parse(r#"{"event":"data","data":42}"#).is_err());
    }
}
