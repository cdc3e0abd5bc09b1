//! End-to-end behavior of the printer against stdout-style and socket viewers.

use std::{
    io::{self, BufRead, BufReader, Write},
    net::TcpListener,
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use proptest::prelude::*;
use serde::Serialize;
use serde_json::Map;
use vizprint::{
    Activation, Content, Envelope, FormatOptions, HtmlRepr, PrintError, PrintOptions, Printer,
    PrinterConfig, TransportError, decode_frame, vprint,
};

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    fn frames(&self) -> Vec<Envelope> {
        self.contents()
            .lines()
            .filter(|line| line.starts_with("json "))
            .map(|line| decode_frame(line).unwrap())
            .collect()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn local_config() -> PrinterConfig {
    PrinterConfig::default().with_host("127.0.0.1")
}

fn json_printer() -> (Printer, SharedBuf) {
    let buf = SharedBuf::default();
    let printer = Printer::with_fallback(local_config().with_env_active(true), buf.clone());
    (printer, buf)
}

fn read_frames(reader: &mut impl BufRead, count: usize) -> Vec<Envelope> {
    (0..count)
        .map(|_| {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            decode_frame(&line).unwrap()
        })
        .collect()
}

#[derive(Serialize)]
struct Sample {
    name: String,
    values: Vec<i64>,
}

struct Badge;

impl HtmlRepr for Badge {
    fn to_html(&self) -> String {
        "<span class=\"badge\">ok</span>".to_string()
    }
}

proptest! {
    #[test]
    fn test_structural_kind_follows_line_breaks(values in prop::collection::vec(any::<i64>(), 0..60), width in 1usize..120) {
        let (mut printer, buf) = json_printer();
        vprint!(printer, values; width = width).unwrap();

        let frames = buf.frames();
        prop_assert_eq!(frames.len(), 2);
        let data = frames[0].data().unwrap();
        let expected = if data.contains('\n') { "block" } else { "str" };
        prop_assert_eq!(frames[0].kind(), expected);

        let format = FormatOptions { width, ..FormatOptions::default() };
        let json = serde_json::to_value(&values).unwrap();
        prop_assert_eq!(data, vizprint_core::pformat(&json, &format));
    }

    #[test]
    fn test_strings_are_sent_verbatim(text in ".*") {
        let (mut printer, buf) = json_printer();
        vprint!(printer, text.as_str()).unwrap();

        let frames = buf.frames();
        prop_assert_eq!(
            &frames[0],
            &Envelope::Str { data: text.clone(), attrs: Map::new() }
        );
    }
}

#[test]
fn test_serializable_struct_prints_as_block_when_wide() {
    let (mut printer, buf) = json_printer();
    let sample = Sample {
        name: "temperatures".to_string(),
        values: (0..30).collect(),
    };
    vprint!(printer, Content::json(&sample).unwrap()).unwrap();

    let frames = buf.frames();
    assert_eq!(frames[0].kind(), "block");
    assert!(frames[0].data().unwrap().starts_with("{\"name\": \"temperatures\",\n"));
}

#[test]
fn test_identifier_is_suffixed_per_entry() {
    let (mut printer, buf) = json_printer();
    vprint!(printer, "a", "b"; id = "X").unwrap();

    let frames = buf.frames();
    let ids: Vec<_> = frames.iter().map(|f| f.id().unwrap()).collect();
    let data: Vec<_> = frames.iter().map(|f| f.data().unwrap()).collect();
    assert_eq!(ids, ["X:0", "X:1", "X:2", "X:3"]);
    assert_eq!(data, ["a", " ", "b", "\n"]);
}

#[test]
fn test_repeated_identifier_targets_same_slots() {
    let (mut printer, buf) = json_printer();
    for step in 0..3_i32 {
        vprint!(printer, step; id = "etc").unwrap();
    }

    let ids: Vec<_> = buf.frames().iter().map(|f| f.id().unwrap().to_string()).collect();
    assert_eq!(ids, ["etc:0", "etc:1", "etc:0", "etc:1", "etc:0", "etc:1"]);
}

#[test]
fn test_refused_activation_falls_back_to_framed_stdout() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let buf = SharedBuf::default();
    let mut printer = Printer::with_fallback(local_config(), buf.clone());

    assert_eq!(printer.activate(port).unwrap(), Activation::Refused);
    assert!(!printer.is_connected());
    assert!(printer.is_redirecting());

    vprint!(printer, "still here").unwrap();
    let lines = buf.lines();
    assert_eq!(lines[0], format!("vizprint: connection refused on port {port}. using stdout."));
    assert_eq!(lines[1], "json {\"type\":\"str\",\"data\":\"still here\"}");
    assert_eq!(lines[2], "json {\"type\":\"str\",\"data\":\"\\n\"}");
}

#[test]
fn test_live_listener_receives_clear_then_output() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let buf = SharedBuf::default();
    let mut printer = Printer::with_fallback(local_config(), buf.clone());

    assert_eq!(printer.vizport(Some(port)).unwrap(), Some(Activation::Connected));
    assert_eq!(buf.contents(), format!("vizprint: sending output to port {port}\n"));

    vprint!(printer, Content::html(&Badge); end = "").unwrap();

    let (stream, _) = listener.accept().unwrap();
    let mut reader = BufReader::new(stream);
    let frames = read_frames(&mut reader, 3);
    assert_eq!(frames[0], Envelope::Clear);
    assert_eq!(frames[1].kind(), "html");
    assert_eq!(frames[1].data(), Some("<span class=\"badge\">ok</span>"));
    assert_eq!(frames[2].data(), Some(""));

    // Nothing but the confirmation reached the fallback path.
    assert_eq!(buf.lines().len(), 1);

    printer.vizport(None).unwrap();
    assert!(!printer.is_redirecting());
    vprint!(printer, "plain again").unwrap();
    assert!(buf.contents().ends_with("plain again\n"));
}

#[test]
fn test_broken_channel_write_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let buf = SharedBuf::default();
    let mut printer = Printer::with_fallback(local_config(), buf.clone());
    assert_eq!(printer.activate(port).unwrap(), Activation::Connected);

    let (stream, _) = listener.accept().unwrap();
    drop(stream);

    // The first writes after the viewer goes away may still be buffered.
    let err = (0..50)
        .find_map(|_| {
            thread::sleep(Duration::from_millis(10));
            vprint!(printer, "lost").err()
        })
        .expect("write to a closed viewer should fail");
    assert!(matches!(err, PrintError::Transport(TransportError::Channel(_))));
    assert!(printer.is_connected());
    assert_eq!(buf.lines().len(), 1);
}

#[test]
fn test_no_values_emit_only_terminator() {
    let (mut printer, buf) = json_printer();
    vprint!(printer).unwrap();

    let frames = buf.frames();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].kind(), "str");
    assert_eq!(frames[0].data(), Some("\n"));
}

#[test]
fn test_file_option_always_prints_plain() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let buf = SharedBuf::default();
    let mut printer = Printer::with_fallback(local_config().with_env_active(true), buf.clone());
    printer.activate(port).unwrap();

    let mut file = Vec::new();
    printer
        .print(
            &[&"x", &1.5_f64],
            PrintOptions::default().sep("=").file(&mut file),
        )
        .unwrap();
    assert_eq!(String::from_utf8(file).unwrap(), "x=1.5\n");
    assert_eq!(buf.lines().len(), 1);
}
