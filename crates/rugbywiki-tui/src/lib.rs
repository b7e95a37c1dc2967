// Terminal front end for rugbywiki.

pub mod tui;
