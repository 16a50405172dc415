//! Built-in search corpus for the in-memory pipeline.

use conductor_agents::SearchHit;

pub fn sample_corpus() -> Vec<SearchHit> {
    vec![
        SearchHit::new(
            "Understanding Ownership",
            "https://doc.rust-lang.org/book/ch04-00-understanding-ownership.html",
            "Ownership is a set of rules that govern how a Rust program manages memory. \
             Each value in Rust has an owner. There can only be one owner at a time.",
        ),
        SearchHit::new(
            "Fearless Concurrency",
            "https://doc.rust-lang.org/book/ch16-00-concurrency.html",
            "Handling concurrent programming safely and efficiently is another of Rust's major goals. \
             The ownership and type systems help manage memory safety and concurrency problems.",
        ),
        SearchHit::new(
            "Async programming in Rust",
            "https://rust-lang.github.io/async-book/",
            "Async code lets a program run many tasks on a small number of threads. \
             Futures in Rust are lazy and do nothing unless polled.",
        ),
        SearchHit::new(
            "The Rust release train",
            "https://blog.rust-lang.org/2014/10/30/Stability.html",
            "Rust ships a new stable release every 6 weeks. \
             Nightly features graduate to beta and then to stable.",
        ),
        SearchHit::new(
            "Writing for the web",
            "https://developers.google.com/search/docs/fundamentals/seo-starter-guide",
            "Search engines reward content written for people. \
             Descriptive titles and a clear lead paragraph help readers find an article.",
        ),
    ]
}
