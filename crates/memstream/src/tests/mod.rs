
mod property_stream;
