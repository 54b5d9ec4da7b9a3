//! Rule-based chat assistant answering questions from live portfolio data.

pub mod extract;
pub mod intent;
pub mod responder;
pub mod router;

pub use extract::{extract_project, mentioned_project, ProjectAlias, PROJECT_ALIASES};
pub use intent::{classify, match_kind, Intent, IntentKind, IntentRule, MitigationArea, RULES};
pub use responder::{
    AssistantReply, IntentResponder, FALLBACK_REPLY, GREETING_REPLY, HELP_REPLY, WELCOME_MESSAGE,
};
pub use router::{assistant_router, AssistantSettings};
