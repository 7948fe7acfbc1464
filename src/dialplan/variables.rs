// File: src/dialplan/variables.rs
use std::borrow::Cow;
use std::fmt;

/// Handler'ların çağrı bacağı üzerinde okuyup yazabildiği dialplan
/// değişkenleri. Liste kapalıdır; yeni bir anahtar buraya eklenmeden
/// kullanılamaz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialplanVar<'a> {
    /// `agent_login` sonucu: `logged`, `already_logged` veya `error`.
    AgentStatus,
    /// `agent_get_status` sonucu: `logged_in`, `logged_out` veya `error`.
    AgentLoginStatus,
    AgentId,
    PathType,
    PathId,
    QueueWrapup,
    QueueName,
    QueueTimeout,
    /// `&` ile birleştirilmiş aranacak arayüzler.
    Interfaces,
    /// `ok`, `empty` veya `unknown`.
    InterfaceStatus,
    /// Bir kullanıcı/dahili için hint dizgesi.
    Hint(&'a str),
    /// Çoklu-contact teknolojisindeki bir cihazın canlı contact'ları.
    DialContacts(&'a str),
}

impl DialplanVar<'_> {
    pub fn name(&self) -> Cow<'static, str> {
        match self {
            Self::AgentStatus => Cow::Borrowed("XIVO_AGENTSTATUS"),
            Self::AgentLoginStatus => Cow::Borrowed("XIVO_AGENT_LOGIN_STATUS"),
            Self::AgentId => Cow::Borrowed("XIVO_AGENTID"),
            Self::PathType => Cow::Borrowed("XIVO_PATH"),
            Self::PathId => Cow::Borrowed("XIVO_PATH_ID"),
            Self::QueueWrapup => Cow::Borrowed("XIVO_QUEUEWRAPUP"),
            Self::QueueName => Cow::Borrowed("XIVO_QUEUENAME"),
            Self::QueueTimeout => Cow::Borrowed("XIVO_QUEUETIMEOUT"),
            Self::Interfaces => Cow::Borrowed("XIVO_INTERFACE"),
            Self::InterfaceStatus => Cow::Borrowed("XIVO_INTERFACE_STATUS"),
            Self::Hint(identifier) => Cow::Owned(format!("HINT({}@usershared)", identifier)),
            Self::DialContacts(device) => Cow::Owned(format!("PJSIP_DIAL_CONTACTS({})", device)),
        }
    }
}

impl fmt::Display for DialplanVar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templated_names() {
        assert_eq!(DialplanVar::Hint("1001").name(), "HINT(1001@usershared)");
        assert_eq!(DialplanVar::DialContacts("abc").name(), "PJSIP_DIAL_CONTACTS(abc)");
        assert_eq!(DialplanVar::PathType.to_string(), "XIVO_PATH");
    }
}
