//! End-to-end flow: key resolution, encrypted text and attachments, the
//! PIN gate, and session unlock state.

use std::fs;

use alcove_core::{ChatError, Config, Messenger, Session, TextContent};
use alcove_types::{ContentKind, Payload};
use tempfile::TempDir;

fn open_messenger() -> (TempDir, Messenger) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new(dir.path().join("alcove.db"), dir.path().join("uploads"));
    let messenger = Messenger::open(&config).unwrap();
    (dir, messenger)
}

#[test]
fn key_resolution_is_order_independent() {
    let (_dir, m) = open_messenger();

    let k1 = m.conversation_key("alice", "bob").unwrap();
    let k2 = m.conversation_key("bob", "alice").unwrap();
    let k3 = m.conversation_key("alice", "bob").unwrap();

    assert_eq!(k1.as_bytes(), k2.as_bytes());
    assert_eq!(k1.as_bytes(), k3.as_bytes());
}

#[test]
fn distinct_pairs_get_distinct_keys() {
    let (_dir, m) = open_messenger();

    let ab = m.conversation_key("alice", "bob").unwrap();
    let ac = m.conversation_key("alice", "carol").unwrap();
    assert_ne!(ab.as_bytes(), ac.as_bytes());
}

#[test]
fn text_round_trip() {
    let (_dir, m) = open_messenger();

    m.send_text("alice", "bob", "hi").unwrap();

    let key = m.conversation_key("bob", "alice").unwrap();
    let records = m.list_ordered("bob", "alice").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].sender, "alice");
    assert_eq!(records[0].kind, ContentKind::Text);
    assert_eq!(
        m.read_text(&key, &records[0]),
        TextContent::Plain("hi".into())
    );
}

#[test]
fn stored_payloads_are_not_plaintext() {
    let (_dir, m) = open_messenger();

    m.send_text("alice", "bob", "meet me at noon").unwrap();

    let records = m.list_ordered("alice", "bob").unwrap();
    let Payload::Inline(token) = &records[0].payload else {
        panic!("text record should carry an inline token");
    };
    let haystack = String::from_utf8_lossy(token);
    assert!(!haystack.contains("meet me at noon"));
}

#[test]
fn wrong_key_reads_as_placeholder() {
    let (_dir, m) = open_messenger();

    m.send_text("alice", "bob", "secret").unwrap();

    let wrong_key = m.conversation_key("alice", "carol").unwrap();
    let records = m.list_ordered("alice", "bob").unwrap();
    let decoded = m.read_text(&wrong_key, &records[0]);
    assert_eq!(decoded, TextContent::Unreadable);
    assert_eq!(decoded.display(), alcove_core::UNREADABLE_PLACEHOLDER);
}

#[test]
fn listing_preserves_insertion_order() {
    let (_dir, m) = open_messenger();

    let bodies = ["one", "two", "three", "four", "five"];
    for (i, body) in bodies.iter().enumerate() {
        let (from, to) = if i % 2 == 0 {
            ("alice", "bob")
        } else {
            ("bob", "alice")
        };
        m.send_text(from, to, body).unwrap();
    }

    let key = m.conversation_key("alice", "bob").unwrap();
    let records = m.list_ordered("alice", "bob").unwrap();
    assert_eq!(records.len(), bodies.len());
    assert!(records.windows(2).all(|w| w[0].id < w[1].id));
    assert!(records.windows(2).all(|w| w[0].sent_at <= w[1].sent_at));
    for (record, body) in records.iter().zip(bodies) {
        assert_eq!(m.read_text(&key, record), TextContent::Plain(body.into()));
    }
}

#[test]
fn empty_content_is_rejected() {
    let (_dir, m) = open_messenger();

    assert!(matches!(
        m.send_text("alice", "bob", ""),
        Err(ChatError::EmptyContent)
    ));
    assert!(matches!(
        m.send_attachment("alice", "bob", &[], "empty.bin", "application/octet-stream"),
        Err(ChatError::EmptyContent)
    ));
    assert!(m.list_ordered("alice", "bob").unwrap().is_empty());
}

#[test]
fn attachment_round_trip() {
    let (_dir, m) = open_messenger();

    let photo: Vec<u8> = (0..2048u32).map(|i| (i % 251) as u8).collect();
    m.send_attachment("alice", "bob", &photo, "holiday.png", "image/png")
        .unwrap();

    let key = m.conversation_key("bob", "alice").unwrap();
    let records = m.list_ordered("bob", "alice").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, ContentKind::Image);

    let Payload::Stored { display_name, .. } = &records[0].payload else {
        panic!("attachment record should reference a blob");
    };
    assert_eq!(display_name, "holiday.png");

    let attachment = m.fetch_attachment(&key, &records[0]).unwrap();
    assert_eq!(attachment.bytes, photo);
    assert_eq!(attachment.display_name, "holiday.png");
    assert_eq!(attachment.kind, ContentKind::Image);
}

#[test]
fn non_image_mime_is_categorized_as_file() {
    let (_dir, m) = open_messenger();

    m.send_attachment("alice", "bob", b"%PDF-1.7", "notes.pdf", "application/pdf")
        .unwrap();

    let records = m.list_ordered("alice", "bob").unwrap();
    assert_eq!(records[0].kind, ContentKind::File);
}

#[test]
fn missing_blob_is_distinct_from_unreadable() {
    let (_dir, m) = open_messenger();

    m.send_attachment("alice", "bob", b"payload", "doc.txt", "text/plain")
        .unwrap();

    let records = m.list_ordered("alice", "bob").unwrap();
    let Payload::Stored { blob_ref, .. } = &records[0].payload else {
        panic!("attachment record should reference a blob");
    };

    // Wrong pair's key: the blob is there but fails authentication.
    let wrong_key = m.conversation_key("alice", "carol").unwrap();
    assert!(matches!(
        m.fetch_attachment(&wrong_key, &records[0]),
        Err(ChatError::Unreadable(_))
    ));

    // Blob deleted out from under the record: a different error.
    fs::remove_file(m.blobs().path_of(blob_ref)).unwrap();
    let key = m.conversation_key("alice", "bob").unwrap();
    assert!(matches!(
        m.fetch_attachment(&key, &records[0]),
        Err(ChatError::BlobMissing(_))
    ));
}

#[test]
fn pin_gate_is_per_user() {
    let (_dir, m) = open_messenger();

    m.set_pin("alice", "bob", "1234").unwrap();

    assert!(m.is_pin_set("alice", "bob").unwrap());
    assert!(!m.is_pin_set("bob", "alice").unwrap());

    assert!(!m.verify_pin("alice", "bob", "0000").unwrap());
    assert!(m.verify_pin("alice", "bob", "1234").unwrap());
    // Bob never set a PIN; nothing verifies for him.
    assert!(!m.verify_pin("bob", "alice", "1234").unwrap());

    // Bob setting his own PIN leaves Alice's untouched.
    m.set_pin("bob", "alice", "9999").unwrap();
    assert!(m.verify_pin("alice", "bob", "1234").unwrap());
    assert!(m.verify_pin("bob", "alice", "9999").unwrap());
    assert!(!m.verify_pin("bob", "alice", "1234").unwrap());
}

#[test]
fn pin_can_be_replaced() {
    let (_dir, m) = open_messenger();

    m.set_pin("alice", "bob", "1111").unwrap();
    m.set_pin("alice", "bob", "2222").unwrap();

    assert!(!m.verify_pin("alice", "bob", "1111").unwrap());
    assert!(m.verify_pin("alice", "bob", "2222").unwrap());
}

#[test]
fn pin_format_is_validated() {
    let (_dir, m) = open_messenger();

    for bad in ["123", "12345", "12a4", "", "١٢٣٤"] {
        assert!(matches!(
            m.set_pin("alice", "bob", bad),
            Err(ChatError::InvalidPin)
        ));
    }
    assert!(!m.is_pin_set("alice", "bob").unwrap());

    m.set_pin("alice", "bob", "1234").unwrap();
    assert!(!m.verify_pin("alice", "bob", "12345").unwrap());
}

#[test]
fn verify_against_unknown_pair_is_false_not_an_error() {
    let (_dir, m) = open_messenger();
    assert!(!m.verify_pin("ghost", "phantom", "0000").unwrap());
    assert!(!m.is_pin_set("ghost", "phantom").unwrap());
}

#[test]
fn session_unlock_resets_on_switch() {
    let (_dir, m) = open_messenger();

    m.set_pin("alice", "bob", "1234").unwrap();

    let mut alice = Session::new("alice");
    alice.switch_to("bob");
    assert!(!alice.can_view(m.db(), "bob").unwrap());

    assert!(!alice.unlock(m.db(), "bob", "0000").unwrap());
    assert!(!alice.can_view(m.db(), "bob").unwrap());

    assert!(alice.unlock(m.db(), "bob", "1234").unwrap());
    assert!(alice.can_view(m.db(), "bob").unwrap());

    // Navigating away and back re-locks the chat.
    alice.switch_to("carol");
    alice.switch_to("bob");
    assert!(!alice.can_view(m.db(), "bob").unwrap());

    // Re-selecting the active chat does not drop the unlock.
    assert!(alice.unlock(m.db(), "bob", "1234").unwrap());
    alice.switch_to("bob");
    assert!(alice.can_view(m.db(), "bob").unwrap());
}

#[test]
fn no_pin_means_no_gate() {
    let (_dir, m) = open_messenger();

    m.set_pin("alice", "bob", "1234").unwrap();

    // Alice's PIN constrains only Alice's own view.
    let mut bob = Session::new("bob");
    bob.switch_to("alice");
    assert!(bob.can_view(m.db(), "alice").unwrap());
}

#[test]
fn first_contact_scenario() {
    let (_dir, m) = open_messenger();

    // Alice and Bob message for the first time.
    let key = m.conversation_key("alice", "bob").unwrap();
    m.send_text("alice", "bob", "hi").unwrap();

    // Alice locks her side of the chat.
    m.set_pin("alice", "bob", "1234").unwrap();

    // Bob set no PIN: he reads the chat directly.
    let mut bob = Session::new("bob");
    bob.switch_to("alice");
    assert!(bob.can_view(m.db(), "alice").unwrap());
    let records = m.list_ordered("bob", "alice").unwrap();
    assert_eq!(m.read_text(&key, &records[0]), TextContent::Plain("hi".into()));

    // Alice, next session, must unlock first.
    let mut alice = Session::new("alice");
    alice.switch_to("bob");
    assert!(!alice.can_view(m.db(), "bob").unwrap());
    assert!(!alice.unlock(m.db(), "bob", "0000").unwrap());
    assert!(!alice.can_view(m.db(), "bob").unwrap());
    assert!(alice.unlock(m.db(), "bob", "1234").unwrap());
    assert!(alice.can_view(m.db(), "bob").unwrap());

    let key_again = m.conversation_key("alice", "bob").unwrap();
    assert_eq!(key.as_bytes(), key_again.as_bytes());
    let records = m.list_ordered("alice", "bob").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        m.read_text(&key_again, &records[0]),
        TextContent::Plain("hi".into())
    );
}
