//! Integration tests for the search core, using an in-memory store and a
//! scripted embedding provider.
