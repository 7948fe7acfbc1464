// File: src/agi/request.rs
use crate::error::ServiceError;
use std::collections::HashMap;

/// FastAGI oturumunun başında gelen `agi_*` ortam bloğu.
#[derive(Debug, Clone, Default)]
pub struct AgiRequest {
    pub env: HashMap<String, String>,
    pub function_name: String,
    pub args: Vec<String>,
}

impl AgiRequest {
    pub fn from_env(env: HashMap<String, String>) -> Result<Self, ServiceError> {
        let script = env
            .get("agi_network_script")
            .ok_or_else(|| ServiceError::AgiProtocol("agi_network_script eksik".to_string()))?;
        let function_name = parse_function_name(script);
        if function_name.is_empty() {
            return Err(ServiceError::AgiProtocol(format!(
                "agi_network_script içinden fonksiyon adı çıkarılamadı: '{}'",
                script
            )));
        }

        let mut args = Vec::new();
        for i in 1.. {
            match env.get(&format!("agi_arg_{}", i)) {
                Some(value) => args.push(value.clone()),
                None => break,
            }
        }

        Ok(Self { env, function_name, args })
    }

    pub fn channel(&self) -> &str {
        self.env.get("agi_channel").map(String::as_str).unwrap_or("unknown")
    }

    pub fn uniqueid(&self) -> &str {
        self.env.get("agi_uniqueid").map(String::as_str).unwrap_or("unknown")
    }
}

/// `agi_network_script` değerinden fonksiyon adını ayıklar, ör.
/// `/agent_login?x=1` -> `agent_login`.
fn parse_function_name(script: &str) -> String {
    let without_query = script.split('?').next().unwrap_or_default();
    without_query.trim_matches('/').trim().to_string()
}

/// Tek bir `agi_key: value` satırını ayrıştırır.
pub fn parse_env_line(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if !key.starts_with("agi_") {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn function_name_and_args_are_extracted() {
        let request = AgiRequest::from_env(env_of(&[
            ("agi_network_script", "agent_login"),
            ("agi_arg_1", "1001"),
            ("agi_arg_2", "PJSIP/abc"),
            ("agi_channel", "PJSIP/abc-00000001"),
        ]))
        .unwrap();
        assert_eq!(request.function_name, "agent_login");
        assert_eq!(request.args, vec!["1001", "PJSIP/abc"]);
        assert_eq!(request.channel(), "PJSIP/abc-00000001");
    }

    #[test]
    fn args_stop_at_first_gap() {
        let request = AgiRequest::from_env(env_of(&[
            ("agi_network_script", "f"),
            ("agi_arg_1", "a"),
            ("agi_arg_3", "c"),
        ]))
        .unwrap();
        assert_eq!(request.args, vec!["a"]);
    }

    #[test]
    fn script_path_and_query_are_stripped() {
        assert_eq!(parse_function_name("/incoming_queue_set_features?foo=bar"), "incoming_queue_set_features");
        assert_eq!(parse_function_name("outgoing_set_path"), "outgoing_set_path");
    }

    #[test]
    fn missing_script_is_a_protocol_error() {
        let err = AgiRequest::from_env(env_of(&[("agi_channel", "x")])).unwrap_err();
        assert!(matches!(err, ServiceError::AgiProtocol(_)));
    }

    #[test]
    fn env_lines_are_parsed() {
        assert_eq!(
            parse_env_line("agi_callerid: 1001"),
            Some(("agi_callerid".to_string(), "1001".to_string()))
        );
        assert_eq!(
            parse_env_line("agi_network_script: agent_login"),
            Some(("agi_network_script".to_string(), "agent_login".to_string()))
        );
        assert_eq!(parse_env_line("garbage"), None);
    }
}
