pub mod checkout;
pub mod cron;
pub mod discounts;
pub mod health;
pub mod signup;
pub mod webhooks;
pub mod worker;
