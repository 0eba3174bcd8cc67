pub mod category;
pub mod result;
pub mod span;

pub use category::ConcernCategory;
pub use result::ConcernResult;
pub use span::{AnnotatedText, CONCERN_LABEL, LabeledExample, Span, SpanAnnotation};
