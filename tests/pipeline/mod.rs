mod cancellation;
mod checkpoints;
mod scenarios;
