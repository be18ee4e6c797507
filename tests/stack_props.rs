use flipbook::{Canvas, FrameStack};

fn canvas() -> Canvas {
    Canvas::new(16, 12).unwrap()
}

#[test]
fn create_count_and_cursor_track_each_call() {
    let mut stack = FrameStack::new(canvas());
    for n in 1..=25 {
        stack.create_frame();
        assert_eq!(stack.len(), n);
        assert_eq!(stack.current_index(), Some(n - 1));
    }
}

#[test]
fn single_frame_delete_then_navigation_stays_empty() {
    let mut stack = FrameStack::new(canvas());
    stack.create_frame();
    stack.delete_current();
    assert_eq!(stack.len(), 0);

    stack.next();
    stack.previous();
    stack.select(0);
    stack.select(7);
    stack.delete_current();
    assert!(stack.is_empty());
    assert_eq!(stack.current_index(), None);
}

#[test]
fn out_of_range_select_never_moves_cursor() {
    for len in 1..6 {
        let mut stack = FrameStack::new(canvas());
        for _ in 0..len {
            stack.create_frame();
        }
        for start in 0..len {
            stack.select(start);
            for bad in [len, len + 1, usize::MAX] {
                assert!(!stack.select(bad));
                assert_eq!(stack.current_index(), Some(start));
            }
        }
    }
}

#[test]
fn cursor_stays_valid_through_mixed_edits() {
    let mut stack = FrameStack::new(canvas());
    let ops = [0u8, 0, 1, 2, 0, 3, 1, 1, 2, 0, 0, 3, 1, 1, 1, 1, 0];
    for op in ops {
        match op {
            0 => {
                stack.create_frame();
            }
            1 => {
                stack.delete_current();
            }
            2 => {
                stack.previous();
            }
            _ => {
                stack.next();
            }
        }
        match stack.current_index() {
            Some(i) => assert!(i < stack.len()),
            None => assert!(stack.is_empty()),
        }
    }
}
