//! `std::io` access through the blocking adapter

mod common;

use std::io::{Read, Seek, SeekFrom, Write};

use common::{MemoryTransport, client};
use ell_core::BlockingFile;

#[test]
fn test_blocking_write_then_read() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());

    let mut writer = BlockingFile::open(&client, "notes.txt", "w").unwrap();
    writeln!(writer, "first line").unwrap();
    writer.write_all(b"second line\n").unwrap();
    writer.flush().unwrap();
    assert_eq!(transport.call_count(), 0);
    writer.close().unwrap();
    assert_eq!(transport.call_count(), 1);

    let mut reader = BlockingFile::open(&client, "notes.txt", "r").unwrap();
    let mut text = String::new();
    reader.read_to_string(&mut text).unwrap();
    assert_eq!(text, "first line\nsecond line\n");

    reader.seek(SeekFrom::Start(6)).unwrap();
    let mut word = [0u8; 4];
    reader.read_exact(&mut word).unwrap();
    assert_eq!(&word, b"line");
    reader.close().unwrap();

    assert_eq!(transport.call_count(), 2);
}

#[test]
fn test_blocking_mode_error_maps_to_io() {
    let transport = MemoryTransport::new();
    let client = client(transport.clone());

    let mut reader = BlockingFile::open(&client, "notes.txt", "r").unwrap();
    let err = reader.write(b"nope").unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::Unsupported);
}

#[test]
fn test_blocking_copy_into_append_handle() {
    let transport = MemoryTransport::new();
    transport.put_object("log.txt", b"a");
    let client = client(transport.clone());

    let mut appender = BlockingFile::open(&client, "log.txt", "a").unwrap();
    std::io::copy(&mut &b"bc"[..], &mut appender).unwrap();
    appender.close().unwrap();

    assert_eq!(transport.object("log.txt").as_deref(), Some(&b"abc"[..]));
}
