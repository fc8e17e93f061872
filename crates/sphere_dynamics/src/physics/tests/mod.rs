//! Multi-body scenarios driven through the collection scheduler
