// End-to-end tests for the CVP Studio backend API
//
// Each test builds the full router with an in-memory client store and a
// scripted generation repository, serves it on an ephemeral port and talks
// to it over HTTP. Nothing leaves the machine, so tests run in parallel.
//
// The PostgreSQL store test needs Docker and is ignored by default.

mod helpers;
mod test_chat;
mod test_health;
mod test_weather;
