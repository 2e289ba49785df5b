//! End-to-end word count: a real coordinator serving on a Unix socket and
//! two in-process worker loops pulling tasks from it.

use std::fs;
use std::time::Duration;

use mr_coordinator::make_coordinator;

#[tokio::test]
async fn word_count_over_a_real_socket() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, "foo bar").expect("write a");
    fs::write(&b, "bar baz").expect("write b");

    let socket = dir.path().join("mr.sock");
    let files = vec![
        a.to_str().expect("utf8 path").to_string(),
        b.to_str().expect("utf8 path").to_string(),
    ];
    let handle = make_coordinator(files, 2, &socket)
        .await
        .expect("make_coordinator");

    let workload = workload::try_named("wc").expect("wc workload");
    let workers: Vec<_> = (0..2)
        .map(|_| tokio::spawn(mr_worker::core::run(workload, socket.clone(), dir.path().to_path_buf())))
        .collect();

    // The driver's poll, sped up; ticks accumulate far slower than the
    // lease limit while healthy workers report within a second or two.
    let mut finished = false;
    for _ in 0..60 {
        if handle.done().await {
            finished = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    assert!(finished, "job did not finish in time");

    for worker in workers {
        worker.abort();
    }
    handle.shutdown();

    let mut lines = Vec::new();
    for partition in 0..2 {
        let output = fs::read_to_string(dir.path().join(format!("mr-out-{partition}.txt")))
            .expect("output file");
        lines.extend(output.lines().map(String::from));
    }
    lines.sort();
    assert_eq!(lines, vec!["bar 2", "baz 1", "foo 1"]);
}
