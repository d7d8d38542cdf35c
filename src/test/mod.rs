mod cli;
mod simulator;
