//! Test helpers: in-process classifier and reader fakes.
//!
//! The fakes can hold an operation open until the test releases it, which is how
//! the race tests force completions to arrive out of order.

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use stegoshield_api_client::Classifier;
use stegoshield_core::{AnalysisResult, SelectedFile};
use stegoshield_workflow::MediaReader;
use tokio::sync::Semaphore;

pub fn png(name: &str, data: &'static str) -> SelectedFile {
    SelectedFile::from_bytes(name, Some("image/png".to_string()), data)
}

/// Classifier fake returning a fixed verdict, optionally blocking until released.
pub struct MockClassifier {
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
    gated: bool,
    release: Semaphore,
    verdicts: Mutex<Vec<Result<AnalysisResult, String>>>,
}

impl MockClassifier {
    pub fn returning(verdict: &str, confidence: f64) -> Arc<Self> {
        Arc::new(Self::build(false, verdict, confidence))
    }

    pub fn gated(verdict: &str, confidence: f64) -> Arc<Self> {
        Arc::new(Self::build(true, verdict, confidence))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        let classifier = Self::build(false, "unused", 0.0);
        *classifier.verdicts.lock().unwrap() = vec![Err(message.to_string())];
        Arc::new(classifier)
    }

    fn build(gated: bool, verdict: &str, confidence: f64) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            gated,
            release: Semaphore::new(0),
            verdicts: Mutex::new(vec![Ok(AnalysisResult::new(verdict, confidence).unwrap())]),
        }
    }

    /// Queue the verdicts returned by successive calls; the last one repeats.
    pub fn then_return(&self, verdict: &str, confidence: f64) {
        self.verdicts
            .lock()
            .unwrap()
            .push(Ok(AnalysisResult::new(verdict, confidence).unwrap()));
    }

    pub fn release_one(&self) {
        self.release.add_permits(1);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(
        &self,
        file_name: &str,
        _content_type: Option<&str>,
        _data: Bytes,
    ) -> Result<AnalysisResult> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(file_name.to_string());

        if self.gated {
            self.release
                .acquire()
                .await
                .expect("release semaphore closed")
                .forget();
        }

        let verdict = {
            let verdicts = self.verdicts.lock().unwrap();
            verdicts[call.min(verdicts.len() - 1)].clone()
        };
        verdict.map_err(|message| anyhow::anyhow!(message))
    }
}

/// Classifier fake whose request panics.
pub struct PanickingClassifier;

#[async_trait]
impl Classifier for PanickingClassifier {
    async fn classify(
        &self,
        _file_name: &str,
        _content_type: Option<&str>,
        _data: Bytes,
    ) -> Result<AnalysisResult> {
        panic!("classifier crashed");
    }
}

/// Reader fake that counts reads and holds reads of one file name until released.
pub struct MockReader {
    reads: AtomicUsize,
    hold: Option<String>,
    fail: Option<String>,
    release: Semaphore,
}

impl MockReader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            reads: AtomicUsize::new(0),
            hold: None,
            fail: None,
            release: Semaphore::new(0),
        })
    }

    pub fn holding(file_name: &str) -> Arc<Self> {
        Arc::new(Self {
            reads: AtomicUsize::new(0),
            hold: Some(file_name.to_string()),
            fail: None,
            release: Semaphore::new(0),
        })
    }

    pub fn failing(file_name: &str) -> Arc<Self> {
        Arc::new(Self {
            reads: AtomicUsize::new(0),
            hold: None,
            fail: Some(file_name.to_string()),
            release: Semaphore::new(0),
        })
    }

    pub fn release(&self) {
        self.release.add_permits(1);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaReader for MockReader {
    async fn read(&self, file: &SelectedFile) -> std::io::Result<Bytes> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        if self.hold.as_deref() == Some(file.name()) {
            self.release
                .acquire()
                .await
                .expect("release semaphore closed")
                .forget();
        }
        if self.fail.as_deref() == Some(file.name()) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "corrupted input",
            ));
        }

        file.read().await
    }
}
