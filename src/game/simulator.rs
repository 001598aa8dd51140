//! Balance simulator for Collidle.
//! Run with: cargo test -p collidle simulate_greedy -- --nocapture
