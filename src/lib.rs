pub mod app;
pub mod flow;
pub mod net;
pub mod report;
pub mod scenario;
pub mod sim;

#[cfg(test)]
mod test;
