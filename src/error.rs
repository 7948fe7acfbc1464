// File: src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Yapılandırma hatası: {0}")]
    Config(#[from] std::env::VarError),

    #[error("Geçersiz yapılandırma değeri '{key}': {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    #[error("I/O hatası: {0}")]
    Io(#[from] std::io::Error),

    #[error("AGI protokol hatası: {0}")]
    AgiProtocol(String),

    #[error("Kanal kapandı (HANGUP)")]
    ChannelHungUp,

    #[error("Bilinmeyen fonksiyon: {0}")]
    UnknownFunction(String),

    #[error("Aynı isimle birden fazla handler kaydedildi: {0}")]
    DuplicateHandlerName(String),

    #[error("'{function}' için zorunlu argüman eksik: {argument}")]
    MissingArgument {
        function: &'static str,
        argument: &'static str,
    },

    #[error("{kind} bulunamadı: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("Kullanıcı çözümlenemedi: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Agent servisi hatası: {0}")]
    AgentClient(#[from] AgentClientError),

    #[error("Redis hatası: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Beklenmedik bir hata oluştu: {0}")]
    Generic(String),
}

/// Arayüz çözümleme hataları. Tanımlı ama aranabilir cihazı olmayan bir
/// kullanıcı hata değildir, boş liste döner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("'{0}' için hint bulunamadı")]
    UnknownUser(String),
}

#[derive(Error, Debug)]
pub enum AgentClientError {
    #[error("agent zaten oturum açmış")]
    AlreadyLogged,

    #[error("agent bulunamadı: {0}")]
    NoSuchAgent(String),

    #[error("agent servisine ulaşılamadı: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("agent servisi beklenmedik yanıt döndü (HTTP {status}): {body}")]
    Unexpected { status: u16, body: String },

    #[error("agent istemcisi başlatılamadı: {0}")]
    Init(String),
}
