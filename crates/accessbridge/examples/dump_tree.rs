//! Load the provider, attach to one window, and dump its accessible tree.
//!
//! Usage: `dump_tree <hwnd> [library-path]`

use std::sync::Arc;

use accessbridge::{AccessBridge, AccessibleNode, BridgeOptions, Hwnd, NativeWindow};

fn dump(node: &Arc<AccessibleNode>, depth: usize) {
    let indent = "  ".repeat(depth);
    match node.get_info() {
        Ok(info) => {
            println!("{indent}{} [{}] ({} children)", info.name, info.role, info.children_count);
            if depth >= 6 {
                return;
            }
            let count = node.children_count().unwrap_or(0);
            for index in 0..count {
                if let Ok(Some(child)) = node.get_child(index) {
                    dump(&child, depth + 1);
                }
            }
        }
        Err(err) => println!("{indent}<error: {err}>"),
    }
}

fn main() {
    let mut args = std::env::args().skip(1);
    let hwnd: isize = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .expect("usage: dump_tree <hwnd> [library-path]");

    let mut options = BridgeOptions {
        collection_size_limit: 64,
        ..BridgeOptions::default()
    };
    options.library_path = args.next().map(Into::into);

    let bridge = AccessBridge::load(options).expect("provider load failed");
    println!("loaded provider ({} ABI)", bridge.variant());

    let native = NativeWindow {
        hwnd: Hwnd(hwnd),
        title: String::new(),
    };
    match bridge.window_from(&native) {
        Ok(Some(window)) => {
            println!("vm {} window {:?}", window.vm_id(), window.hwnd());
            dump(window.root(), 0);
        }
        Ok(None) => println!("window is not backed by the provider"),
        Err(err) => println!("root construction failed: {err}"),
    }
}
