//! Bootstrap phases for nodes joining a cluster: bootstrap token secrets and
//! the public cluster discovery record.

pub mod discovery;
pub mod token;

#[cfg(test)]
mod fake;
