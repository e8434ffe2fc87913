#![allow(dead_code)]

use async_trait::async_trait;
use codehealth_core::{AnalysisError, CommandRunner, Result, ToolInvocation};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

pub const REPORT: &str = "\
info: src/extension.ts:1: Code health score: 9,75
warning: src/extension.ts:2:bad-fn:complex-fn Complex function (cc: 10)
";

pub const SOURCE: &str = "// header\nfunction bad-fn(a,b,c) {\n}\n";

/// Stand-in for the analysis tool that records every invocation.
pub struct FakeRunner {
    calls: AtomicUsize,
    invocations: Mutex<Vec<ToolInvocation>>,
    gate: Option<Semaphore>,
    output: String,
    failure: Option<i32>,
}

impl FakeRunner {
    pub fn reporting(output: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            invocations: Mutex::new(Vec::new()),
            gate: None,
            output: output.to_string(),
            failure: None,
        }
    }

    pub fn failing(code: i32) -> Self {
        Self {
            failure: Some(code),
            ..Self::reporting("")
        }
    }

    /// Runs block until [`release`](Self::release) hands out a permit.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub fn release(&self, runs: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(runs);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn invocations(&self) -> Vec<ToolInvocation> {
        self.invocations.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, invocation: ToolInvocation) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.invocations
            .lock()
            .expect("lock poisoned")
            .push(invocation);

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .expect("gate closed")
                .forget();
        }

        match self.failure {
            Some(code) => Err(AnalysisError::Execution {
                code: Some(code),
                stderr: "analysis failed".to_string(),
            }),
            None => Ok(self.output.clone()),
        }
    }
}
