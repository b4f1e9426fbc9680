use crossbeam_channel::{bounded, Receiver};

enum Feed<T> {
    Job(T),
    Done,
}

/// Fans jobs out over a bounded channel to scoped workers, one poison pill
/// per worker. Callers own any cross-job state; jobs must be independent.
pub fn run_parallel<T, F>(jobs: Vec<T>, f: F)
where
    T: Send,
    F: Fn(T) + Sync,
{
    let n_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(jobs.len())
        .max(1);
    let (sender, receiver) = bounded(n_threads * 2);

    std::thread::scope(|s| {
        for _ in 0..n_threads {
            let r = receiver.clone();
            let f = &f;
            s.spawn(move || work(r, f));
        }
        for job in jobs {
            sender.send(Feed::Job(job)).unwrap();
        }
        for _ in 0..n_threads {
            sender.send(Feed::Done).unwrap();
        }
    });
}

fn work<T, F>(receiver: Receiver<Feed<T>>, f: &F)
where
    F: Fn(T),
{
    loop {
        match receiver.recv() {
            Ok(Feed::Job(job)) => f(job),
            _ => break,
        }
    }
}
