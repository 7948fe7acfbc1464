// File: src/agi/memory.rs
use super::channel::CallChannel;
use crate::error::ServiceError;
use async_trait::async_trait;
use std::collections::HashMap;

/// Testlerde kullanılan, değişkenleri bellekte tutan kanal.
#[derive(Debug, Default, Clone)]
pub struct MemoryChannel {
    pub variables: HashMap<String, String>,
    pub writes: Vec<(String, String)>,
    pub spoken: Vec<String>,
}

impl MemoryChannel {
    pub fn with_variables(pairs: &[(&str, &str)]) -> Self {
        Self {
            variables: pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ..Default::default()
        }
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }
}

#[async_trait]
impl CallChannel for MemoryChannel {
    async fn get_variable(&mut self, name: &str) -> Result<Option<String>, ServiceError> {
        Ok(self.variables.get(name).filter(|v| !v.is_empty()).cloned())
    }

    async fn set_variable(&mut self, name: &str, value: &str) -> Result<(), ServiceError> {
        self.writes.push((name.to_string(), value.to_string()));
        self.variables.insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn say_number(&mut self, digits: &str) -> Result<(), ServiceError> {
        self.spoken.push(digits.to_string());
        Ok(())
    }
}
