// File: src/dialplan/interfaces.rs
//
// Mantıksal bir kullanıcı/dahili kimliğini aranacak somut cihaz
// arayüzlerine çevirir. Sonuçlar hiçbir zaman önbelleğe alınmaz; cihaz
// kayıt durumu çağrılar arasında değişir.

use super::session::Session;
use super::variables::DialplanVar;
use crate::error::{ResolveError, ServiceError};
use tracing::{debug, info, instrument};

/// Aynı uç noktanın birden fazla eşzamanlı contact'a sahip olabildiği
/// teknolojiler. Her contact ayrı aranır.
pub const MULTI_CONTACT_TECHNOLOGIES: &[&str] = &["pjsip"];

const DELIMITER: char = '&';

fn is_multi_contact(technology: &str) -> bool {
    MULTI_CONTACT_TECHNOLOGIES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(technology))
}

fn split_tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(DELIMITER).map(str::trim).filter(|t| !t.is_empty())
}

/// `identifier` için aranacak arayüzleri hint sırasına göre döndürür.
///
/// Hint hiç yoksa `ResolveError::UnknownUser` döner. Hint var ama
/// bütün cihazlar çevrimdışıysa sonuç boş listedir ve hata değildir.
/// Farklı token'lardan gelen aynı arayüzler tekilleştirilmez.
#[instrument(skip(session))]
pub async fn resolve(session: &mut Session<'_>, identifier: &str) -> Result<Vec<String>, ServiceError> {
    let hint = session
        .get(DialplanVar::Hint(identifier))
        .await?
        .ok_or_else(|| ResolveError::UnknownUser(identifier.to_string()))?;

    let mut interfaces = Vec::new();
    for token in split_tokens(&hint) {
        let Some((technology, name)) = token.split_once('/') else {
            interfaces.push(token.to_string());
            continue;
        };

        if !is_multi_contact(technology) {
            interfaces.push(token.to_string());
            continue;
        }

        match session.get(DialplanVar::DialContacts(name)).await? {
            Some(contacts) => interfaces.extend(split_tokens(&contacts).map(str::to_string)),
            // Canlı contact'ı olmayan cihaz aranmaz.
            None => debug!(device = name, "Cihazın kayıtlı contact'ı yok, atlanıyor."),
        }
    }

    info!(count = interfaces.len(), "Arayüzler çözümlendi.");
    Ok(interfaces)
}
