//! Integration tests driving the assembled application over the memory provider.

mod helpers;

mod api_test;
mod lifecycle_test;
mod notification_test;
