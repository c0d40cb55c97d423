use log::*;
use spinlock_rs::*;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let url = env_or("SPINLOCK_REDIS_URL", "redis://127.0.0.1:6379/");
    let name = env_or("SPINLOCK_NAME", "spinlock-rs");
    let workers: usize = env_or("SPINLOCK_WORKERS", "3").parse()?;

    let (tx, rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        let _ = tx.send(true);
    })?;

    let lock = Spinlock::builder()
        .store(Arc::new(RedisStore::open(&url)?))
        .ttl(Duration::from_secs(2))
        .attempt_interval(Duration::from_millis(200))
        .keepalive_interval(Duration::from_millis(500))
        .build()?;

    let mut handles = vec![];
    for id in 0..workers {
        let lock = lock.clone();
        let name = name.clone();
        let stop = rx.clone();
        handles.push(tokio::spawn(async move {
            while !*stop.borrow() {
                let res = lock
                    .acquire(&name, |release| async move {
                        info!(
                            "[{id}] holding '{}' since {}",
                            release.name(),
                            release.acquired_at()
                        );
                        tokio::time::sleep(Duration::from_millis(1500)).await;
                        Ok(id)
                    })
                    .await;

                match res {
                    Ok(v) => info!("[{v}] released"),
                    Err(e) => error!("[{id}] acquire failed: {e:#}"),
                }

                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }));
    }

    for h in handles {
        h.await?;
    }

    Ok(())
}
