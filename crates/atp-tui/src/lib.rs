// Terminal front end for the ATP statistics dashboard.
//
// `app` owns the loaded tables and per-page filter state; `tui` draws them
// and turns key presses into `protocol::UserCommand`s.

pub mod app;
pub mod protocol;
pub mod tui;

#[cfg(test)]
pub(crate) mod test_support;
