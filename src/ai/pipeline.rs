//! Background AI requests and the slots holding their latest results.
//!
//! Each request runs as its own tokio task and reports back over a channel.
//! Results are only applied by the owner of the pipeline, so the explanation
//! and answer slots are never touched from a task. Every request is numbered
//! per flow; a reply is applied only if no newer request of the same flow
//! was issued after it.

use super::error::AiError;
use super::explanation::{
    AiExplanation, SOLVE_APOLOGY, WordProblemAnswer, explanation_request, parse_explanation,
    word_problem_request,
};
use super::service::TextService;
use crate::history::Calculation;
use std::sync::Arc;

/// Outcome of one finished request.
#[derive(Debug)]
pub enum AiUpdate {
    Explanation {
        seq: u64,
        calculation_id: String,
        result: Result<AiExplanation, AiError>,
    },
    WordProblem {
        seq: u64,
        answer: WordProblemAnswer,
    },
}

/// Sequence bookkeeping for one request flow.
#[derive(Debug, Default)]
struct Flow {
    latest: u64,
    in_flight: usize,
}

impl Flow {
    fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.in_flight += 1;
        self.latest
    }

    /// Mark `seq` finished, returning whether it is still the newest request.
    fn settle(&mut self, seq: u64) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        seq == self.latest
    }
}

pub struct ExplanationPipeline {
    service: Arc<dyn TextService>,
    tx: flume::Sender<AiUpdate>,
    rx: flume::Receiver<AiUpdate>,
    explanations: Flow,
    solves: Flow,
    explanation: Option<AiExplanation>,
    answer: Option<WordProblemAnswer>,
}

impl ExplanationPipeline {
    pub fn new(service: Arc<dyn TextService>) -> Self {
        let (tx, rx) = flume::unbounded();
        Self {
            service,
            tx,
            rx,
            explanations: Flow::default(),
            solves: Flow::default(),
            explanation: None,
            answer: None,
        }
    }

    /// Ask for an explanation of a freshly logged calculation.
    ///
    /// Must be called from within a tokio runtime. Returns the request's
    /// sequence number.
    pub fn request_explanation(&mut self, calculation: &Calculation) -> u64 {
        let seq = self.explanations.issue();
        let request = explanation_request(&calculation.expression, &calculation.result);
        let calculation_id = calculation.id.clone();
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();

        tracing::info!(seq, expression = %calculation.expression, "requesting explanation");

        tokio::spawn(async move {
            let result = match service.generate(request).await {
                Ok(text) => parse_explanation(&text),
                Err(err) => Err(err),
            };
            let update = AiUpdate::Explanation {
                seq,
                calculation_id,
                result,
            };
            if tx.send(update).is_err() {
                tracing::debug!(seq, "pipeline dropped before explanation arrived");
            }
        });

        seq
    }

    /// Ask the service to solve a free-text word problem.
    ///
    /// Failures resolve to an apology text instead of an error. A blank
    /// problem is ignored and returns `None`.
    pub fn solve_word_problem(&mut self, problem: &str) -> Option<u64> {
        if problem.trim().is_empty() {
            tracing::debug!("ignoring blank word problem");
            return None;
        }

        let seq = self.solves.issue();
        let request = word_problem_request(problem);
        let problem = problem.to_string();
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();

        tracing::info!(seq, "solving word problem");

        tokio::spawn(async move {
            let text = match service.generate(request).await {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(seq, error = %err, "word problem request failed");
                    SOLVE_APOLOGY.to_string()
                }
            };
            let update = AiUpdate::WordProblem {
                seq,
                answer: WordProblemAnswer { problem, text },
            };
            if tx.send(update).is_err() {
                tracing::debug!(seq, "pipeline dropped before answer arrived");
            }
        });

        Some(seq)
    }

    /// Apply one finished request. Returns `true` if a slot changed.
    pub fn apply(&mut self, update: AiUpdate) -> bool {
        match update {
            AiUpdate::Explanation {
                seq,
                calculation_id,
                result,
            } => {
                let current = self.explanations.settle(seq);
                match result {
                    Ok(explanation) if current => {
                        tracing::debug!(seq, %calculation_id, "explanation updated");
                        self.explanation = Some(explanation);
                        true
                    }
                    Ok(_) => {
                        tracing::debug!(seq, latest = self.explanations.latest, "discarding stale explanation");
                        false
                    }
                    Err(AiError::Disabled) => false,
                    Err(err) => {
                        tracing::warn!(seq, %calculation_id, error = %err, "AI insight error");
                        false
                    }
                }
            }
            AiUpdate::WordProblem { seq, answer } => {
                if self.solves.settle(seq) {
                    self.answer = Some(answer);
                    true
                } else {
                    tracing::debug!(seq, latest = self.solves.latest, "discarding stale answer");
                    false
                }
            }
        }
    }

    /// Apply every update that has already arrived, without waiting.
    pub fn drain(&mut self) -> usize {
        let updates: Vec<AiUpdate> = self.rx.try_iter().collect();
        let mut changed = 0;
        for update in updates {
            if self.apply(update) {
                changed += 1;
            }
        }
        changed
    }

    /// A handle for awaiting updates while the pipeline itself is borrowed elsewhere.
    pub fn updates(&self) -> flume::Receiver<AiUpdate> {
        self.rx.clone()
    }

    /// Latest successful explanation.
    pub fn explanation(&self) -> Option<&AiExplanation> {
        self.explanation.as_ref()
    }

    /// Latest word-problem answer (or apology).
    pub fn answer(&self) -> Option<&WordProblemAnswer> {
        self.answer.as_ref()
    }

    /// Whether any explanation request is outstanding.
    pub fn is_explaining(&self) -> bool {
        self.explanations.in_flight > 0
    }

    /// Whether any word-problem request is outstanding.
    pub fn is_solving(&self) -> bool {
        self.solves.in_flight > 0
    }
}
