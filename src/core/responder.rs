use crate::core::formatter::{format_reply, CAMPAIGN_HASHTAG};
use crate::core::gacha::Gacha;
use crate::core::menu_store::MenuStore;
use crate::domain::model::{tag, Budget, Event, Selection, UnsignedEvent};
use crate::domain::ports::EventSigner;
use crate::utils::error::Result;
use chrono::Utc;
use std::sync::Arc;

/// Turns an inbound mention into a signed gacha reply.
#[derive(Clone)]
pub struct Responder {
    store: Arc<MenuStore>,
    signer: Arc<dyn EventSigner>,
    gacha: Gacha,
}

impl Responder {
    pub fn new(store: Arc<MenuStore>, signer: Arc<dyn EventSigner>) -> Self {
        Self {
            store,
            signer,
            gacha: Gacha::new(),
        }
    }

    /// Decodes a JSON event body and answers it.
    pub fn respond_to_json(&self, body: &[u8]) -> Result<Event> {
        let inbound: Event = serde_json::from_slice(body)?;
        self.respond(&inbound)
    }

    pub fn respond(&self, inbound: &Event) -> Result<Event> {
        let budget = Budget::from_content(&inbound.content);
        let selection = self.draw(budget);

        tracing::debug!(
            "Gacha for {} with {} yen: {} items, {} yen spent",
            inbound.id,
            budget.yen(),
            selection.len(),
            selection.spent
        );

        let unsigned = build_reply(
            inbound,
            self.signer.public_key()?,
            Utc::now().timestamp(),
            format_reply(&selection),
        );
        sign_event(self.signer.as_ref(), unsigned)
    }

    pub fn draw(&self, budget: Budget) -> Selection {
        let snapshot = self.store.snapshot();
        self.gacha.draw(budget, &snapshot)
    }
}

/// Reply addressed to `inbound`: reply marker, propagated `e` tags, author
/// mention and the campaign topic, without duplicates.
pub fn build_reply(
    inbound: &Event,
    pubkey: String,
    created_at: i64,
    content: String,
) -> UnsignedEvent {
    let mut reply = UnsignedEvent {
        pubkey,
        created_at,
        kind: inbound.kind,
        tags: Vec::new(),
        content,
    };

    reply.push_unique_tag(tag(&["e", &inbound.id, "", "reply"]));
    for t in inbound.tags_with_key("e") {
        reply.push_unique_tag(t.clone());
    }
    reply.push_unique_tag(tag(&["p", &inbound.pubkey]));
    reply.push_unique_tag(tag(&["t", CAMPAIGN_HASHTAG]));
    reply
}

pub fn sign_event(signer: &dyn EventSigner, unsigned: UnsignedEvent) -> Result<Event> {
    let digest = unsigned.digest()?;
    let sig = signer.sign(&digest)?;
    Ok(unsigned.into_event(hex::encode(digest), sig))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{MenuItem, MenuSnapshot};
    use crate::utils::error::GachaError;

    struct StubSigner;

    impl EventSigner for StubSigner {
        fn public_key(&self) -> Result<String> {
            Ok("b0".repeat(32))
        }

        fn sign(&self, digest: &[u8; 32]) -> Result<String> {
            Ok(format!("sig:{}", hex::encode(digest)))
        }
    }

    struct BrokenSigner;

    impl EventSigner for BrokenSigner {
        fn public_key(&self) -> Result<String> {
            Err(GachaError::KeyError {
                message: "no key".to_string(),
            })
        }

        fn sign(&self, _digest: &[u8; 32]) -> Result<String> {
            unreachable!()
        }
    }

    fn inbound() -> Event {
        Event {
            id: "in1".to_string(),
            pubkey: "author".to_string(),
            created_at: 1_700_000_000,
            kind: 42,
            tags: vec![
                tag(&["e", "root", "", "root"]),
                tag(&["p", "someone"]),
                tag(&["e", "in1", "", "reply"]),
            ],
            content: "gacha 500".to_string(),
            sig: String::new(),
        }
    }

    fn responder(signer: Arc<dyn EventSigner>) -> Responder {
        let store = Arc::new(MenuStore::with_snapshot(MenuSnapshot::new(
            vec![MenuItem::new(3001, "フォッカチオ", 150)],
            None,
        )));
        Responder::new(store, signer)
    }

    #[test]
    fn test_build_reply_tags() {
        let reply = build_reply(&inbound(), "me".into(), 1, "body".into());
        assert_eq!(
            reply.tags,
            vec![
                tag(&["e", "in1", "", "reply"]),
                tag(&["e", "root", "", "root"]),
                tag(&["p", "author"]),
                tag(&["t", "サイゼリヤガチャ"]),
            ]
        );
        assert_eq!(reply.kind, 42);
    }

    #[test]
    fn test_respond_uses_budget_from_content() {
        let reply = responder(Arc::new(StubSigner)).respond(&inbound()).unwrap();
        // 500 yen buys three 150 yen focaccia.
        assert_eq!(reply.content.matches("フォッカチオ").count(), 3);
        assert!(reply.content.ends_with("\n\n#サイゼリヤガチャ"));
        assert_eq!(reply.pubkey, "b0".repeat(32));
        assert_eq!(reply.sig, format!("sig:{}", reply.id));
        assert_eq!(reply.kind, 42);
    }

    #[test]
    fn test_respond_defaults_budget() {
        let mut event = inbound();
        event.content = "gacha please now".to_string();
        let reply = responder(Arc::new(StubSigner)).respond(&event).unwrap();
        assert_eq!(reply.content.matches("フォッカチオ").count(), 1000 / 150);
    }

    #[test]
    fn test_respond_to_malformed_json() {
        let err = responder(Arc::new(StubSigner))
            .respond_to_json(b"not json")
            .unwrap_err();
        assert!(matches!(err, GachaError::SerializationError(_)));
    }

    #[test]
    fn test_signer_failure_aborts() {
        let err = responder(Arc::new(BrokenSigner)).respond(&inbound()).unwrap_err();
        assert!(matches!(err, GachaError::KeyError { .. }));
    }

    #[test]
    fn test_event_id_matches_digest() {
        let unsigned = build_reply(&inbound(), "me".into(), 5, "x".into());
        let digest = unsigned.digest().unwrap();
        let event = sign_event(&StubSigner, unsigned).unwrap();
        assert_eq!(event.id, hex::encode(digest));
    }
}
