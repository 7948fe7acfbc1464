// File: src/agi/connection.rs
use super::channel::CallChannel;
use super::request::{parse_env_line, AgiRequest};
use crate::error::ServiceError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufStream};
use tracing::{debug, warn};

/// Tek bir protokol satırı için üst sınır (bayt).
const MAX_LINE_LEN: u64 = 8 * 1024;
/// Ortam bloğu veya kullanım mesajı en fazla bu kadar satır olabilir.
const MAX_BLOCK_LINES: usize = 256;

static RESPONSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{3} result=(-?\d+)(?: \((.*)\))?(?: .*)?$").expect("sabit regex geçerli olmalı")
});

/// Asterisk'in bir AGI komutuna verdiği yanıt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgiResponse {
    pub result: i64,
    pub data: Option<String>,
}

pub fn parse_response(line: &str) -> Result<AgiResponse, ServiceError> {
    let caps = RESPONSE_RE
        .captures(line)
        .ok_or_else(|| ServiceError::AgiProtocol(format!("ayrıştırılamayan AGI yanıtı: '{}'", line)))?;
    let result = caps[1]
        .parse::<i64>()
        .map_err(|e| ServiceError::AgiProtocol(e.to_string()))?;
    let data = caps.get(2).map(|m| m.as_str().to_string());
    Ok(AgiResponse { result, data })
}

fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', " ");
    format!("\"{}\"", escaped)
}

/// Tek bir FastAGI TCP oturumu. Oturum başına bir çağrı bacağına bağlıdır.
pub struct AgiConnection<S> {
    stream: BufStream<S>,
    hung_up: bool,
}

impl<S> AgiConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream: BufStream::new(stream),
            hung_up: false,
        }
    }

    /// Boş satıra kadar gelen `agi_*` ortam bloğunu okur.
    pub async fn read_request(&mut self) -> Result<AgiRequest, ServiceError> {
        let mut env = HashMap::new();
        for _ in 0..=MAX_BLOCK_LINES {
            let Some(line) = self.read_bounded_line().await? else {
                return Err(ServiceError::AgiProtocol(
                    "ortam bloğu tamamlanmadan bağlantı kapandı".to_string(),
                ));
            };
            if line.is_empty() {
                return AgiRequest::from_env(env);
            }
            match parse_env_line(&line) {
                Some((key, value)) => {
                    env.insert(key, value);
                }
                None => debug!(line = %line, "AGI ortam bloğunda tanınmayan satır görmezden geliniyor."),
            }
        }
        Err(ServiceError::AgiProtocol(format!(
            "ortam bloğu {} satır sınırını aşıyor",
            MAX_BLOCK_LINES
        )))
    }

    pub async fn verbose(&mut self, message: &str) -> Result<(), ServiceError> {
        self.execute(&format!("VERBOSE {} 1", quote(message))).await.map(|_| ())
    }

    pub fn is_hung_up(&self) -> bool {
        self.hung_up
    }

    pub async fn execute(&mut self, command: &str) -> Result<AgiResponse, ServiceError> {
        if self.hung_up {
            return Err(ServiceError::ChannelHungUp);
        }
        debug!(command, "AGI komutu gönderiliyor.");
        self.stream.write_all(command.as_bytes()).await?;
        self.stream.write_all(b"\n").await?;
        self.stream.flush().await?;

        loop {
            let line = self.read_line().await?;
            if line == "HANGUP" {
                // Asenkron kapanma bildirimi; asıl yanıt hâlâ gelecek.
                self.hung_up = true;
                continue;
            }
            if let Some(rest) = line.strip_prefix("520-") {
                let usage = self.read_usage(rest).await?;
                return Err(ServiceError::AgiProtocol(format!("geçersiz komut sözdizimi: {}", usage)));
            }

            return match line.get(..3) {
                Some("200") => parse_response(&line),
                Some("511") => {
                    self.hung_up = true;
                    Err(ServiceError::ChannelHungUp)
                }
                _ => {
                    warn!(command, response = %line, "AGI komutu başarısız oldu.");
                    Err(ServiceError::AgiProtocol(format!("'{}' komutu reddedildi: {}", command, line)))
                }
            };
        }
    }

    /// Satır sonu olmadan `MAX_LINE_LEN` baytı aşan satırlar protokol hatasıdır.
    /// Bağlantı kapandıysa `None` döner.
    async fn read_bounded_line(&mut self) -> Result<Option<String>, ServiceError> {
        let mut line = String::new();
        let read = (&mut self.stream).take(MAX_LINE_LEN).read_line(&mut line).await?;
        if read == 0 {
            return Ok(None);
        }
        if !line.ends_with('\n') && read as u64 >= MAX_LINE_LEN {
            return Err(ServiceError::AgiProtocol(format!(
                "satır {} bayt sınırını aşıyor",
                MAX_LINE_LEN
            )));
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    async fn read_line(&mut self) -> Result<String, ServiceError> {
        match self.read_bounded_line().await? {
            Some(line) => Ok(line),
            None => {
                self.hung_up = true;
                Err(ServiceError::ChannelHungUp)
            }
        }
    }

    async fn read_usage(&mut self, first: &str) -> Result<String, ServiceError> {
        let mut usage = vec![first.to_string()];
        while usage.len() <= MAX_BLOCK_LINES {
            let line = self.read_line().await?;
            if line.starts_with("520 ") {
                return Ok(usage.join(" "));
            }
            usage.push(line);
        }
        Err(ServiceError::AgiProtocol("520 kullanım mesajı sonlanmadı".to_string()))
    }
}

#[async_trait]
impl<S> CallChannel for AgiConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn get_variable(&mut self, name: &str) -> Result<Option<String>, ServiceError> {
        let response = self.execute(&format!("GET VARIABLE {}", name)).await?;
        if response.result != 1 {
            return Ok(None);
        }
        Ok(response.data.filter(|v| !v.is_empty()))
    }

    async fn set_variable(&mut self, name: &str, value: &str) -> Result<(), ServiceError> {
        self.execute(&format!("SET VARIABLE {} {}", name, quote(value)))
            .await
            .map(|_| ())
    }

    async fn say_number(&mut self, digits: &str) -> Result<(), ServiceError> {
        let digits = digits.trim();
        let numeric = digits.strip_prefix('-').unwrap_or(digits);
        if numeric.is_empty() || !numeric.chars().all(|c| c.is_ascii_digit()) {
            return Err(ServiceError::AgiProtocol(format!("SAY NUMBER için geçersiz değer: '{}'", digits)));
        }
        let response = self.execute(&format!("SAY NUMBER {} \"\"", digits)).await?;
        if response.result < 0 {
            return Err(ServiceError::ChannelHungUp);
        }
        Ok(())
    }
}
