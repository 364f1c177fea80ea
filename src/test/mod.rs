mod address;
mod applications;
mod event_queue;
mod sim_time;
mod simulator;
