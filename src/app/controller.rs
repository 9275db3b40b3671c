//! The controller owning every piece of calculator and AI state.

use super::event::Event;
use crate::ai::{AiExplanation, AiUpdate, ExplanationPipeline, TextService, WordProblemAnswer};
use crate::calculator::{self, CalculatorMode, CalculatorState, Key};
use crate::history::{Calculation, HistoryLog};
use std::sync::Arc;

/// Single owner of the display, history and AI slots.
///
/// Every mutation goes through [`Controller::handle`] or
/// [`Controller::apply_ai_update`], both of which run to completion before
/// the next event is looked at.
pub struct Controller {
    state: CalculatorState,
    mode: CalculatorMode,
    history: HistoryLog,
    pipeline: ExplanationPipeline,
}

impl Controller {
    pub fn new(mode: CalculatorMode, service: Arc<dyn TextService>) -> Self {
        Self {
            state: CalculatorState::default(),
            mode,
            history: HistoryLog::new(),
            pipeline: ExplanationPipeline::new(service),
        }
    }

    /// Handle one event from the presentation layer.
    ///
    /// Calculations that complete are logged before their explanation is
    /// requested. Must run inside a tokio runtime.
    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.press(key),
            Event::SetMode(mode) => {
                tracing::debug!(%mode, "mode changed");
                self.mode = mode;
            }
            Event::SelectHistory(id) => self.select_history(&id),
            Event::ClearHistory => {
                tracing::debug!(entries = self.history.len(), "history cleared");
                self.history.clear();
            }
            Event::SolveWordProblem(problem) => {
                self.pipeline.solve_word_problem(&problem);
            }
        }
    }

    fn press(&mut self, key: Key) {
        let transition = calculator::apply(&self.state, key);
        self.state = transition.state;

        if let Some(record) = transition.record {
            let calculation = self.history.push(Calculation::from(record)).clone();
            self.pipeline.request_explanation(&calculation);
        }
    }

    fn select_history(&mut self, id: &str) {
        match self.history.get(id) {
            Some(calculation) => {
                self.state =
                    CalculatorState::new(calculation.result.clone(), calculation.expression.clone());
            }
            None => tracing::warn!(%id, "selected history entry no longer exists"),
        }
    }

    /// Apply a finished AI request. Returns `true` if the AI slots changed.
    pub fn apply_ai_update(&mut self, update: AiUpdate) -> bool {
        self.pipeline.apply(update)
    }

    /// Apply every AI result that has already arrived.
    pub fn drain_ai(&mut self) -> usize {
        self.pipeline.drain()
    }

    /// Receiver for AI results, for use in a select loop.
    pub fn ai_updates(&self) -> flume::Receiver<AiUpdate> {
        self.pipeline.updates()
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn display(&self) -> &str {
        &self.state.display
    }

    pub fn expression(&self) -> &str {
        &self.state.expression
    }

    pub fn mode(&self) -> CalculatorMode {
        self.mode
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn explanation(&self) -> Option<&AiExplanation> {
        self.pipeline.explanation()
    }

    pub fn answer(&self) -> Option<&WordProblemAnswer> {
        self.pipeline.answer()
    }

    pub fn is_explaining(&self) -> bool {
        self.pipeline.is_explaining()
    }

    pub fn is_solving(&self) -> bool {
        self.pipeline.is_solving()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::FnService;
    use crate::calculator::{AggregateFn, ERROR_MARKER, Operator, ScientificFn};
    use crate::history::HISTORY_LIMIT;

    fn controller() -> Controller {
        let service = FnService::new(|request| {
            Ok(format!(
                r#"{{"explanation":"{}","steps":[],"tips":[]}}"#,
                request.prompt.lines().next().unwrap_or_default()
            ))
        });
        Controller::new(CalculatorMode::Basic, Arc::new(service))
    }

    async fn settle_ai(controller: &mut Controller) -> bool {
        let update = controller.ai_updates().recv_async().await.unwrap();
        controller.apply_ai_update(update)
    }

    fn press_all(controller: &mut Controller, keys: &[Key]) {
        for key in keys {
            controller.handle(Event::Key(*key));
        }
    }

    #[tokio::test]
    async fn test_addition_scenario() {
        let mut controller = controller();
        press_all(
            &mut controller,
            &[
                Key::Digit(5),
                Key::Operator(Operator::Add),
                Key::Digit(3),
                Key::Evaluate,
            ],
        );

        assert_eq!(controller.display(), "8");
        assert_eq!(controller.expression(), "");
        assert_eq!(controller.history().len(), 1);
        let entry = controller.history().nth(0).unwrap();
        assert_eq!(entry.expression, "5 + 3");
        assert_eq!(entry.result, "8");

        assert!(controller.is_explaining());
        assert!(settle_ai(&mut controller).await);
        assert!(!controller.is_explaining());
        assert!(controller.explanation().unwrap().explanation.contains("5 + 3 = 8"));
    }

    #[tokio::test]
    async fn test_division_by_zero_scenario() {
        let mut controller = controller();
        press_all(
            &mut controller,
            &[
                Key::Digit(9),
                Key::Operator(Operator::Divide),
                Key::Digit(0),
                Key::Evaluate,
            ],
        );

        assert_eq!(controller.display(), ERROR_MARKER);
        assert!(controller.history().is_empty());
        assert!(!controller.is_explaining());
    }

    #[tokio::test]
    async fn test_hypot_scenario() {
        let mut controller = controller();
        controller.handle(Event::SetMode(CalculatorMode::Custom));
        press_all(
            &mut controller,
            &[
                Key::Digit(3),
                Key::Separator,
                Key::Digit(4),
                Key::Aggregate(AggregateFn::Hypot),
            ],
        );

        assert_eq!(controller.mode(), CalculatorMode::Custom);
        assert_eq!(controller.display(), "5");
        assert_eq!(controller.history().len(), 1);
        assert_eq!(controller.history().nth(0).unwrap().expression, "hypot(3,4)");
    }

    #[tokio::test]
    async fn test_clear_keeps_history() {
        let mut controller = controller();
        press_all(
            &mut controller,
            &[
                Key::Digit(2),
                Key::Operator(Operator::Multiply),
                Key::Digit(4),
                Key::Evaluate,
                Key::Digit(1),
                Key::Operator(Operator::Subtract),
                Key::Digit(7),
                Key::Clear,
            ],
        );

        assert_eq!(controller.state(), &CalculatorState::default());
        assert_eq!(controller.history().len(), 1);
    }

    #[tokio::test]
    async fn test_multi_value_arithmetic_is_rejected() {
        let mut controller = controller();
        press_all(
            &mut controller,
            &[
                Key::Digit(1),
                Key::Operator(Operator::Add),
                Key::Digit(2),
                Key::Separator,
                Key::Digit(3),
                Key::Evaluate,
            ],
        );

        assert_eq!(controller.display(), ERROR_MARKER);
        assert!(controller.history().is_empty());
    }

    #[tokio::test]
    async fn test_pi_is_not_logged() {
        let mut controller = controller();
        controller.handle(Event::Key(Key::Scientific(ScientificFn::Pi)));

        assert_eq!(controller.display(), "3.141592653589793");
        assert!(controller.history().is_empty());
        assert!(!controller.is_explaining());
    }

    #[tokio::test]
    async fn test_select_history_restores_slots() {
        let mut controller = controller();
        press_all(
            &mut controller,
            &[
                Key::Digit(6),
                Key::Operator(Operator::Multiply),
                Key::Digit(7),
                Key::Evaluate,
                Key::Clear,
            ],
        );
        let id = controller.history().nth(0).unwrap().id.clone();
        let before: Vec<Calculation> = controller.history().iter().cloned().collect();

        controller.handle(Event::SelectHistory(id));

        assert_eq!(controller.display(), "42");
        assert_eq!(controller.expression(), "6 × 7");
        let after: Vec<Calculation> = controller.history().iter().cloned().collect();
        assert_eq!(before, after);

        controller.handle(Event::SelectHistory("unknown".to_string()));
        assert_eq!(controller.display(), "42");
    }

    #[tokio::test]
    async fn test_history_is_capped() {
        let mut controller = controller();
        for _ in 0..(HISTORY_LIMIT + 5) {
            press_all(
                &mut controller,
                &[
                    Key::Digit(1),
                    Key::Operator(Operator::Add),
                    Key::Digit(1),
                    Key::Evaluate,
                    Key::Clear,
                ],
            );
        }

        assert_eq!(controller.history().len(), HISTORY_LIMIT);

        controller.handle(Event::ClearHistory);
        assert!(controller.history().is_empty());
    }

    #[tokio::test]
    async fn test_blank_word_problem_does_nothing() {
        let mut controller = controller();
        controller.handle(Event::SolveWordProblem("   ".to_string()));

        assert!(!controller.is_solving());
        assert!(controller.answer().is_none());
        assert!(controller.ai_updates().is_empty());
    }

    #[tokio::test]
    async fn test_word_problem_is_independent() {
        let mut controller = controller();
        controller.handle(Event::SolveWordProblem("Half of ten?".to_string()));

        assert!(controller.is_solving());
        assert!(!controller.is_explaining());
        assert!(settle_ai(&mut controller).await);
        assert!(controller.answer().is_some());
        assert!(controller.explanation().is_none());
        assert_eq!(controller.display(), "0");
    }
}
