// Resume generation: validation gate, rendering, durable storage, download links.
// Rendering is CPU-bound and runs on the blocking pool; storage writes are awaited.

pub mod generator;
pub mod handlers;
