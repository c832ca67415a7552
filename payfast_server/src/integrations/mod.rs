pub mod payment_log;
