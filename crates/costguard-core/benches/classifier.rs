use costguard::classifier::Classifier;
use costguard::models::ActivityEvent;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

fn bench_classify(c: &mut Criterion) {
    let classifier = Classifier::default();

    let paid_instance = ActivityEvent::from_value(json!({
        "eventName": "RunInstances",
        "eventSource": "ec2.amazonaws.com",
        "userIdentity": {"type": "IAMUser", "arn": "arn:aws:iam::123456789012:user/dev"},
        "requestParameters": {"instanceType": "m5.large"}
    }))
    .unwrap();

    let unhandled = ActivityEvent::from_value(json!({
        "eventName": "DescribeInstances",
        "userIdentity": {"type": "AssumedRole"}
    }))
    .unwrap();

    c.bench_function("classify_run_instances", |b| {
        b.iter(|| classifier.classify(black_box(&paid_instance)))
    });

    c.bench_function("classify_unhandled", |b| {
        b.iter(|| classifier.classify(black_box(&unhandled)))
    });
}

fn bench_parse(c: &mut Criterion) {
    let raw = json!({
        "version": "0",
        "detail-type": "AWS API Call via CloudTrail",
        "source": "aws.ec2",
        "detail": {
            "eventName": "CreateVolume",
            "eventSource": "ec2.amazonaws.com",
            "userIdentity": {"type": "IAMUser", "arn": "arn:aws:iam::123456789012:user/dev"},
            "requestParameters": {"size": 100, "volumeType": "gp3"}
        }
    })
    .to_string();

    c.bench_function("parse_envelope", |b| {
        b.iter(|| ActivityEvent::from_json(black_box(&raw)))
    });
}

criterion_group!(benches, bench_classify, bench_parse);
criterion_main!(benches);
