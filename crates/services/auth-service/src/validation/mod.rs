//! Input checks that need network access.

mod email_domain;

pub use email_domain::{DnsMxLookup, EmailDomainValidator, MxLookup};

#[cfg(test)]
pub use email_domain::MockMxLookup;
