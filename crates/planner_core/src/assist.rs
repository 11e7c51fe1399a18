//! Optional study-plan assistant seam.
//!
//! # Responsibility
//! - Build a study-plan prompt from the current agenda and hand it to an
//!   external text-generation collaborator.
//!
//! # Invariants
//! - Fire-and-forget: assistant failures never affect scheduling
//!   correctness or block the caller.

use crate::model::activity::Activity;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::thread::JoinHandle;

const SYSTEM_INSTRUCTION: &str = "You are a study planning assistant for a university \
student. Given the upcoming schedule, propose a short, realistic study plan. \
Answer in plain text.";

/// One text-generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyPlanRequest {
    pub system_instruction: String,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistError {
    Backend(String),
}

impl Display for AssistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(message) => write!(f, "assistant backend failure: {message}"),
        }
    }
}

impl Error for AssistError {}

/// Text-generation collaborator; concrete transport lives outside core.
pub trait StudyPlanBackend: Send + Sync {
    fn generate(&self, request: &StudyPlanRequest) -> Result<String, AssistError>;
}

/// Summarizes the agenda into a prompt.
pub fn build_request(activities: &[Activity]) -> StudyPlanRequest {
    let mut prompt = String::from("My upcoming schedule:\n");
    if activities.is_empty() {
        prompt.push_str("(nothing scheduled)\n");
    }
    for activity in activities {
        prompt.push_str(&format!(
            "- {} [{}] on {} at {}\n",
            activity.title,
            activity.kind.as_str(),
            activity.date,
            activity.time
        ));
    }
    StudyPlanRequest {
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        prompt,
    }
}

/// Runs the assistant call on a background thread, reporting through the
/// completion callback.
pub fn request_study_plan(
    backend: Arc<dyn StudyPlanBackend>,
    activities: Vec<Activity>,
    on_done: Box<dyn FnOnce(Result<String, AssistError>) + Send>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let request = build_request(&activities);
        let result = backend.generate(&request);
        if let Err(err) = &result {
            warn!("event=assist_request module=assist status=error error={err}");
        }
        on_done(result);
    })
}

#[cfg(test)]
mod tests {
    use super::{build_request, request_study_plan, AssistError, StudyPlanBackend,
        StudyPlanRequest};
    use crate::model::activity::{ActivityDraft, ActivityType};
    use std::sync::mpsc;
    use std::sync::Arc;
    use uuid::Uuid;

    struct CannedBackend;

    impl StudyPlanBackend for CannedBackend {
        fn generate(&self, request: &StudyPlanRequest) -> Result<String, AssistError> {
            assert!(request.prompt.contains("Midterm"));
            Ok("Study two hours per evening.".to_string())
        }
    }

    #[test]
    fn prompt_lists_each_activity() {
        let mut draft = ActivityDraft::new("2026-03-10", "Midterm");
        draft.kind = ActivityType::Exam;
        let activity = draft.into_activity(Uuid::new_v4());

        let request = build_request(&[activity]);
        assert!(request.prompt.contains("- Midterm [exam] on 2026-03-10 at 08:00"));
    }

    #[test]
    fn completion_callback_receives_the_generated_plan() {
        let activity = ActivityDraft::new("2026-03-10", "Midterm").into_activity(Uuid::new_v4());
        let (tx, rx) = mpsc::channel();

        let handle = request_study_plan(
            Arc::new(CannedBackend),
            vec![activity],
            Box::new(move |result| {
                tx.send(result).unwrap();
            }),
        );
        handle.join().unwrap();

        assert_eq!(
            rx.recv().unwrap().unwrap(),
            "Study two hours per evening."
        );
    }
}
