pub mod countdown_event;
