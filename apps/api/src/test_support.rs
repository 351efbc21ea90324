//! Fake completion clients shared by unit and router tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::llm_client::{CompletionError, TextCompletionClient};

/// Replays a fixed script of outcomes, one per call, and records every prompt it receives.
/// Once the script runs out, further calls fail with an upstream error.
pub struct ScriptedClient {
    outcomes: Mutex<VecDeque<Result<String, CompletionError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicU32,
}

impl ScriptedClient {
    pub fn new(outcomes: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextCompletionClient for ScriptedClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(CompletionError::Upstream {
                    status: None,
                    message: "script exhausted".to_string(),
                })
            })
    }
}

/// Never answers within any reasonable timeout.
pub struct HangingClient;

#[async_trait]
impl TextCompletionClient for HangingClient {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok("{}".to_string())
    }
}

/// Hangs like `HangingClient`, but signals when a call starts and records when the in-flight
/// call is dropped.
#[derive(Default)]
pub struct DropTrackingClient {
    pub started: Notify,
    dropped: Arc<AtomicBool>,
}

impl DropTrackingClient {
    pub fn was_dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

struct SetOnDrop(Arc<AtomicBool>);

impl Drop for SetOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl TextCompletionClient for DropTrackingClient {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        let _guard = SetOnDrop(self.dropped.clone());
        self.started.notify_one();
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok("{}".to_string())
    }
}

/// Reads a DOCX package back and returns the text of every paragraph, in order.
pub fn docx_paragraphs(bytes: &[u8]) -> Vec<String> {
    use quick_xml::events::Event;
    use quick_xml::Reader;
    use std::io::{Cursor, Read};

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut in_text = false;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == b"w:p" => paragraphs.push(String::new()),
            Event::Empty(e) if e.name().as_ref() == b"w:p" => paragraphs.push(String::new()),
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(e) if e.name().as_ref() == b"w:t" => in_text = false,
            Event::Text(t) if in_text => {
                let text = t.unescape().unwrap();
                paragraphs.last_mut().unwrap().push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    paragraphs
}

/// Decodes the operand of every `Tj` text-show operator in a PDF, in order.
///
/// Counts empty lines, which text extraction cannot see. Panics with a message on a truncated
/// or malformed literal string.
pub fn pdf_shown_strings(pdf: &[u8]) -> Vec<Vec<u8>> {
    let mut shown = Vec::new();
    let mut i = 0;
    while let Some(&b) = pdf.get(i) {
        i += 1;
        if b != b'(' {
            continue;
        }
        let mut s = Vec::new();
        loop {
            match pdf.get(i) {
                None => panic!("unterminated literal string at byte {i}"),
                Some(b')') => break,
                Some(b'\\') => {
                    let octal = pdf
                        .get(i + 1..i + 4)
                        .and_then(|d| std::str::from_utf8(d).ok())
                        .and_then(|d| u8::from_str_radix(d, 8).ok());
                    match (octal, pdf.get(i + 1)) {
                        (Some(code), _) => {
                            s.push(code);
                            i += 4;
                        }
                        (None, Some(&escaped)) => {
                            s.push(escaped);
                            i += 2;
                        }
                        (None, None) => panic!("dangling escape at byte {i}"),
                    }
                }
                Some(&c) => {
                    s.push(c);
                    i += 1;
                }
            }
        }
        i += 1;
        if pdf.get(i..).is_some_and(|rest| rest.starts_with(b" Tj")) {
            shown.push(s);
        }
    }
    shown
}

/// Non-blank text lines as a PDF reader extracts them, trimmed.
pub fn pdf_text_lines(pdf: &[u8]) -> Vec<String> {
    let text = pdf_extract::extract_text_from_mem(pdf).unwrap();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Number of page objects in a PDF.
pub fn pdf_page_count(pdf: &[u8]) -> usize {
    pdf.windows(b"/Type /Page /".len())
        .filter(|w| *w == b"/Type /Page /")
        .count()
}
