use super::*;

#[test]
fn closures_are_observers() {
    let mut seen = Vec::new();
    {
        let mut obs = |p: f32, m: &str| seen.push((p, m.to_owned()));
        obs.on_progress(10.0, "a");
    }
    assert_eq!(seen, vec![(10.0, "a".to_owned())]);
}

#[test]
fn progress_is_clamped_and_monotonic() {
    let mut seen = Vec::new();
    let mut obs = |p: f32, _: &str| seen.push(p);
    let mut progress = Progress::new(&mut obs);
    progress.report(-5.0, "start");
    progress.report(50.0, "half");
    progress.report(40.0, "back");
    progress.report(f32::NAN, "nan");
    progress.report(250.0, "over");
    drop(progress);
    assert_eq!(seen, vec![0.0, 50.0, 50.0, 50.0, 100.0]);
}
