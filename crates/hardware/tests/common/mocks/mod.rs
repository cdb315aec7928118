//! Mock and probe bus devices.
