//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

/// Overall status of a load operation, ordered by severity
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum ProcessStatus {
    Info,
    Warn,
    Error,
}

/// Structured accumulator used instead of exceptions for recoverable
/// per-record failures: one overall status, a summary text and a list of
/// detail messages.
#[derive(Clone, PartialEq, Debug)]
pub struct ProcessResult {
    pub status: ProcessStatus,
    pub text: String,
    pub details: Vec<String>,
}

impl ProcessResult {
    pub fn new(text: &str) -> ProcessResult {
        ProcessResult {
            status: ProcessStatus::Info,
            text: text.to_string(),
            details: Vec::new(),
        }
    }

    /// Append a detail message and raise the status monotonically. The first
    /// degradation to WARN appends a fixed suffix to the summary text.
    pub fn add_detail(&mut self, status: ProcessStatus, text: &str) {
        self.details.push(text.to_string());
        if status > self.status {
            if self.status == ProcessStatus::Info && status == ProcessStatus::Warn {
                self.text.push_str(" with warnings");
            }
            self.status = status;
        }
    }

    /// Total failure of the operation: replace the summary text, set ERROR
    /// and record the cause as a detail
    pub fn fail(&mut self, text: &str, detail: &str) {
        self.text = text.to_string();
        self.status = ProcessStatus::Error;
        self.details.push(detail.to_string());
    }

    pub fn is_error(&self) -> bool {
        self.status == ProcessStatus::Error
    }
}
