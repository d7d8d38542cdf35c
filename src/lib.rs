pub mod cli;
pub mod error;
pub mod net;
pub mod queue;
pub mod sim;
pub mod viz;

#[cfg(test)]
mod test;
