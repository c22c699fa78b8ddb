/*
 * Shoals
 *
 * Two flocking scenes with predators:
 * - The ocean: a fish school that can be peaceful, hunted or swept into a vortex
 * - The sky: a boiling murmuration stalked by a falcon
 *
 * Usage: shoals [config.json]
 * Logging is configured through RUST_LOG.
 */

use shoals::app::{model, update};

fn main() {
    env_logger::init();

    nannou::app(model)
        .update(update)
        .run();
}
