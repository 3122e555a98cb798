pub mod metrics;
pub mod prompt;
pub mod providers;
pub mod relay;

pub use metrics::{get_metrics, init_metrics};
pub use prompt::PromptTemplate;
pub use relay::{LayoutRelay, RelayError};
