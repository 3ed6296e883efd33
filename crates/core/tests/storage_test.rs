//! End-to-end behaviour of the client and its file handles against an
//! in-memory cluster, with and without a name prefix.

mod common;

use std::io::SeekFrom;

use common::{MemoryTransport, client, client_with};
use ell_core::{Error, HttpErrorKind, Method, StorageBackend};

const SAMPLE1: &[u8] = b"<xml>test data</xml>";
const SAMPLE2: &[u8] = b"<xml>more test data</xml>";

#[tokio::test]
async fn test_save_then_fetch_round_trip() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());

    for data in [&b""[..], SAMPLE1, &[0u8, 159, 146, 150][..]] {
        let name = client.save("test.xml", data.to_vec(), false).await.unwrap();
        assert_eq!(name, "test.xml");
        assert_eq!(client.fetch("test.xml").await.unwrap().as_ref(), data);
    }
}

#[tokio::test]
async fn test_prefixes_are_applied() {
    for prefix in ["", "prefix", "long/prefix"] {
        let transport = MemoryTransport::new();
        let client = client_with(transport.clone(), prefix);

        client.save("test.xml", SAMPLE1, false).await.unwrap();
        let key = if prefix.is_empty() {
            "test.xml".to_string()
        } else {
            format!("{prefix}/test.xml")
        };
        assert_eq!(transport.object(&key).as_deref(), Some(SAMPLE1));
        assert!(client.exists("test.xml").await);
    }
}

#[tokio::test]
async fn test_open_existing() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());
    client.save("test.xml", SAMPLE1, false).await.unwrap();

    let mut file = client.open("test.xml", "r").unwrap();
    assert_eq!(file.read(None).await.unwrap(), SAMPLE1);
    file.close().await.unwrap();

    let mut file = client.open("test.xml", "w").unwrap();
    assert_eq!(file.write(SAMPLE2).await.unwrap(), SAMPLE2.len());
    file.close().await.unwrap();

    let mut file = client.open("test.xml", "r").unwrap();
    assert_eq!(file.read(None).await.unwrap(), SAMPLE2);
    file.close().await.unwrap();
}

#[tokio::test]
async fn test_open_new() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());

    let mut file = client.open("new.xml", "wb").unwrap();
    file.write(b"<xml>").await.unwrap();
    file.write(b"test data</xml>").await.unwrap();
    assert_eq!(transport.call_count(), 0);
    file.close().await.unwrap();
    assert_eq!(transport.call_count(), 1);

    assert_eq!(client.fetch("new.xml").await.unwrap().as_ref(), SAMPLE1);
}

#[tokio::test]
async fn test_append() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());
    client.save("test.xml", SAMPLE1, false).await.unwrap();

    let mut file = client.open("test.xml", "a").unwrap();
    file.write(SAMPLE2).await.unwrap();
    file.close().await.unwrap();

    let (method, url) = transport.calls().pop().unwrap();
    assert_eq!(method, Method::Post);
    assert!(url.ends_with("/upload/test.xml?ioflags=2"));

    let expected = [SAMPLE1, SAMPLE2].concat();
    assert_eq!(client.fetch("test.xml").await.unwrap().as_ref(), expected.as_slice());
}

#[tokio::test]
async fn test_mode_protect() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());

    let mut file = client.open("test.xml", "r").unwrap();
    assert!(matches!(file.write(SAMPLE1).await, Err(Error::Mode(_))));
    file.close().await.unwrap();

    for mode in ["w", "a"] {
        let mut file = client.open("test.xml", mode).unwrap();
        assert!(matches!(file.read(None).await, Err(Error::Mode(_))));
        file.close().await.unwrap();
    }

    // Only the two write/append closes touched the network
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_delete() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());

    client.save("test.xml", SAMPLE1, false).await.unwrap();
    assert!(client.exists("test.xml").await);
    client.delete("test.xml").await.unwrap();
    assert!(!client.exists("test.xml").await);

    // Deleting again answers 404, which is not reported
    client.delete("test.xml").await.unwrap();
}

#[tokio::test]
async fn test_read_handle_closed_without_read_is_offline() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());

    let mut file = client.open("test.xml", "r").unwrap();
    file.close().await.unwrap();
    file.close().await.unwrap();
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_write_handle_closed_without_write_saves_empty_once() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());
    client.save("test.xml", SAMPLE1, false).await.unwrap();

    let mut file = client.open("test.xml", "w").unwrap();
    file.close().await.unwrap();
    file.close().await.unwrap();

    let uploads = transport
        .calls()
        .into_iter()
        .filter(|(method, _)| *method == Method::Post)
        .count();
    assert_eq!(uploads, 2);
    assert_eq!(transport.object("test.xml").as_deref(), Some(&b""[..]));
}

#[tokio::test]
async fn test_lazy_single_fetch() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());
    client.save("test.xml", SAMPLE1, false).await.unwrap();
    let before = transport.call_count();

    let mut file = client.open("test.xml", "r").unwrap();
    assert_eq!(transport.call_count(), before);

    assert_eq!(file.read(Some(5)).await.unwrap(), b"<xml>");
    assert_eq!(file.read(Some(4)).await.unwrap(), b"test");
    assert_eq!(file.read(None).await.unwrap(), b" data</xml>");
    assert_eq!(file.read(Some(10)).await.unwrap(), b"");
    assert_eq!(transport.call_count(), before + 1);
}

#[tokio::test]
async fn test_seek_forces_fetch() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());
    client.save("test.xml", SAMPLE1, false).await.unwrap();

    let mut file = client.open("test.xml", "r").unwrap();
    assert_eq!(file.seek(SeekFrom::End(-6)).await.unwrap(), 14);
    assert_eq!(file.read(None).await.unwrap(), b"</xml>");

    file.seek(SeekFrom::Start(0)).await.unwrap();
    assert_eq!(file.read(Some(5)).await.unwrap(), b"<xml>");
    assert_eq!(file.position(), 5);
}

#[tokio::test]
async fn test_append_handle_only_grows() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());
    transport.put_object("log.txt", b"AAA");

    let mut file = client.open("log.txt", "a").unwrap();
    file.write(b"hello").await.unwrap();
    assert!(matches!(file.seek(SeekFrom::Start(0)).await, Err(Error::Mode(_))));
    file.write(b"J").await.unwrap();
    assert_eq!(file.position(), 6);
    file.close().await.unwrap();

    assert_eq!(transport.object("log.txt").as_deref(), Some(&b"AAAhelloJ"[..]));
}

#[tokio::test]
async fn test_write_handle_cannot_seek() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());

    let mut file = client.open("test.txt", "w").unwrap();
    file.write(b"hello world").await.unwrap();
    assert!(matches!(file.seek(SeekFrom::Start(6)).await, Err(Error::Mode(_))));
    file.write(b"!").await.unwrap();
    file.close().await.unwrap();

    assert_eq!(transport.object("test.txt").as_deref(), Some(&b"hello world!"[..]));
}

#[tokio::test]
async fn test_closed_property() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());
    client.save("test.xml", SAMPLE1, false).await.unwrap();

    let mut reader = client.open("test.xml", "r").unwrap();
    assert!(reader.closed());
    reader.read(Some(1)).await.unwrap();
    assert!(!reader.closed());
    reader.close().await.unwrap();
    assert!(!reader.closed());

    let mut writer = client.open("out.xml", "w").unwrap();
    assert!(writer.closed());
    writer.write(b"data").await.unwrap();
    assert!(!writer.closed());
    writer.close().await.unwrap();
    assert!(!writer.closed());

    let mut unused = client.open("empty.xml", "w").unwrap();
    unused.close().await.unwrap();
    assert!(unused.closed());
}

#[tokio::test]
async fn test_io_after_close_fails() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());

    let mut writer = client.open("out.xml", "w").unwrap();
    writer.write(b"x").await.unwrap();
    writer.close().await.unwrap();
    assert!(matches!(writer.write(b"y").await, Err(Error::Closed(_))));

    let mut reader = client.open("out.xml", "r").unwrap();
    reader.close().await.unwrap();
    assert!(matches!(reader.read(None).await, Err(Error::Closed(_))));
}

#[tokio::test]
async fn test_failed_upload_is_not_repeated() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());

    let mut file = client.open("test.xml", "w").unwrap();
    file.write(SAMPLE1).await.unwrap();
    transport.force_status(500);

    let err = file.close().await.unwrap_err();
    match err {
        Error::Http(e) => assert_eq!(e.kind, HttpErrorKind::Save),
        other => panic!("unexpected error: {other:?}"),
    }

    file.close().await.unwrap();
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_read_missing_object() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());

    let mut file = client.open("missing.xml", "r").unwrap();
    let err = file.read(None).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_exists_for_error_statuses() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());
    assert!(!client.exists("nothing").await);

    client.save("test.xml", SAMPLE1, false).await.unwrap();
    transport.force_status(500);
    assert!(!client.exists("test.xml").await);
}

#[tokio::test]
async fn test_storage_backend_contract() {
    let transport = MemoryTransport::new();
    let backend: Box<dyn StorageBackend> = Box::new(client(transport.clone()));

    let mut content: &[u8] = SAMPLE1;
    let stored = backend.save("doc.xml", &mut content).await.unwrap();
    assert_eq!(stored, "doc.xml");
    assert!(backend.exists("doc.xml").await);
    assert_eq!(backend.url("doc.xml"), "http://pub:8080/get/doc.xml");

    let mut file = backend.open("doc.xml", "r").unwrap();
    assert_eq!(file.read(None).await.unwrap(), SAMPLE1);

    backend.delete("doc.xml").await.unwrap();
    assert!(!backend.exists("doc.xml").await);
}

#[tokio::test]
async fn test_invalid_mode_before_network() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());

    for mode in ["rw", "r+", "", "q"] {
        assert!(matches!(client.open("test.xml", mode), Err(Error::InvalidMode(_))));
    }
    assert_eq!(transport.call_count(), 0);
}
