// Domain-layer modules: parsing, rules and verdicts
pub mod date_parser {
    pub use crate::date_parser::*;
}

pub mod rules {
    pub use crate::rules::*;
}

pub mod verdict {
    pub use crate::verdict::*;
}

pub mod validation {
    pub use crate::validation::*;
}

pub mod models {
    pub use crate::models::*;
}
