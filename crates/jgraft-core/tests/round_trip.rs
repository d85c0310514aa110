//! Parse, print, and compare with the input modulo blank lines

use jgraft_core::config::{CommentsConfiguration, JGraftConfiguration, PrinterConfiguration};
use jgraft_core::printer::normalize;
use jgraft_core::{CaptureStrategy, Session};

fn config(strategy: CaptureStrategy, header: bool) -> JGraftConfiguration {
    JGraftConfiguration {
        printer: Some(PrinterConfiguration {
            line_ending: Some(jgraft_core::config::LineEnding::Lf),
            header: Some(header),
            ..Default::default()
        }),
        comments: Some(CommentsConfiguration {
            strategy: Some(strategy),
        }),
        ..Default::default()
    }
}

fn print(source: &str, strategy: CaptureStrategy, header: bool) -> String {
    let mut session = Session::new(config(strategy, header)).unwrap();
    let parsed = session.parse("Test.java", source).unwrap();
    assert!(!parsed.has_errors(), "{:?}", parsed.syntax_errors);
    session.print_to_string(&parsed.unit).unwrap()
}

fn assert_round_trip(source: &str) {
    for strategy in [CaptureStrategy::TreeExtras, CaptureStrategy::LexicalScan] {
        let printed = print(source, strategy, false);
        assert_eq!(normalize(&printed), normalize(source), "strategy {strategy:?}");
    }
}

#[test]
fn test_class_with_comments() {
    assert_round_trip(
        "package com.example;

import java.util.List;
import java.util.ArrayList;

/**
 * A greeter.
 */
public class Greeter {
	// names to greet
	private List<String> names = new ArrayList<>();

	private int count; // how many

	public Greeter(int count) {
		this.count = count;
	}

	@Override
	public String toString() {
		/* summary */
		return \"Greeter \" + count;
	}
}
",
    );
}

#[test]
fn test_control_flow() {
    assert_round_trip(
        "class Flow {
	int run(int[] values, int limit) {
		int total = 0;
		for (int i = 0; i < values.length; i++) {
			if (values[i] > limit) {
				continue;
			} else {
				total += values[i];
			}
		}
		for (int value : values) {
			while (value > 0) {
				value--;
			}
		}
		try {
			total = check(total);
		} catch (IllegalStateException e) {
			throw new RuntimeException(e);
		} finally {
			total++;
		}
		return total;
	}
}
",
    );
}

#[test]
fn test_switch_and_lambdas() {
    assert_round_trip(
        "class Mixed {
	String name(int x) {
		switch (x) {
		case 1:
			return \"one\";
		default:
			return \"many\";
		}
	}

	void each(java.util.List<String> items) {
		items.forEach(item -> System.out.println(item));
		items.stream().map(String::trim).count();
	}
}
",
    );
}

#[test]
fn test_enum_and_interface() {
    assert_round_trip(
        "enum Color {
	RED,
	GREEN(2),
	BLUE;
	Color() {
	}
	Color(int shade) {
	}
}

interface Shape {
	double area();
	int SIDES = 4;
}
",
    );
}

#[test]
fn test_comment_before_closing_brace() {
    assert_round_trip(
        "class A {
	void f() {
		g();
		// nothing else
	}
	// end of class
}
",
    );
}

#[test]
fn test_header_is_ignored_by_normalize() {
    let source = "class A {\n\tint x;\n}\n";
    let printed = print(source, CaptureStrategy::TreeExtras, true);
    assert!(printed.starts_with(jgraft_core::printer::HEADER_PREFIX));
    assert_eq!(normalize(&printed), normalize(source));
}

#[test]
fn test_printing_is_stable() {
    let source = "class A {\n\t// c\n\tint x = (1 + 2) * 3;\n}\n";
    let once = print(source, CaptureStrategy::TreeExtras, false);
    let twice = print(&once, CaptureStrategy::TreeExtras, false);
    assert_eq!(normalize(&once), normalize(&twice));
}
