//! End-to-end reconciliation against the in-memory host

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tola_reconcile::prelude::*;

fn mounted(node: impl Into<Node>) -> (MemoryHost, HostId, Node) {
    let mut host = MemoryHost::new();
    let root = host.create_root("body");
    let mut node = node.into();
    mount(&mut node, root, None, &mut host).unwrap();
    host.clear_mutations();
    (host, root, node)
}

#[test]
fn test_scenario_text_update() {
    let (mut host, root, old) = mounted(h("div").text("0"));
    let div = old.host_id().unwrap();
    let text_id = old.children()[0].host_id().unwrap();

    let new = patch(old, h("div").text("1").into(), root, &mut host).unwrap();

    assert_eq!(host.mutations(), [Mutation::SetText { node: text_id, value: "1".into() }]);
    assert_eq!(new.host_id(), Some(div));
    assert_eq!(new.children()[0].host_id(), Some(text_id));
    assert_eq!(render_html(&host, root), "<body><div>1</div></body>");
}

#[test]
fn test_scenario_move_by_content() {
    let (mut host, root, old) = mounted(h("ul").child(h("li").text("A")).child(h("li").text("B")));
    let ul = old.host_id().unwrap();
    let [a, b] = [0, 1].map(|i| host.children(ul)[i]);

    let new = h("ul").child(h("li").text("B")).child(h("li").text("A"));
    let mut reconciler = Reconciler::with_config(&mut host, PatchConfig::by_content());
    let committed = reconciler.patch(old, new.into(), root).unwrap();
    let stats = reconciler.stats();

    assert_eq!(stats.nodes_moved, 1);
    assert_eq!(stats.nodes_mounted, 0);
    assert_eq!(stats.nodes_destroyed, 0);
    assert_eq!(host.children(ul), [b, a]);
    assert_eq!(host.text_content(ul), "BA");
    assert!(!host.mutations().iter().any(|m| m.is_create() || m.is_remove()));
    assert_eq!(committed.children()[0].host_id(), Some(b));
}

#[test]
fn test_scenario_replace() {
    let (mut host, root, old) = mounted(h("span").child(h("b").text("x")));
    let span = old.host_id().unwrap();
    let inner = old.children()[0].host_id().unwrap();

    let new = patch(old, h("p").child(h("b").text("x")).into(), root, &mut host).unwrap();

    assert!(!host.is_live(span));
    assert!(!host.is_live(inner));
    let p = new.host_id().unwrap();
    assert_eq!(host.children(root), [p]);
    assert_eq!(render_html(&host, root), "<body><p><b>x</b></p></body>");

    // Matching descendants are remounted, not carried over
    assert_ne!(new.children()[0].host_id(), Some(inner));
}

#[test]
fn test_patch_idempotence() {
    let handler = Handler::new(|_| {});
    let tree = h("main")
        .attr("id", "app")
        .with_class("dark")
        .child(h("h1").style("color", "red").text("Title"))
        .child(fragment([h("p").on("click", handler).text("one"), h("p").text("two")]))
        .child(h("ul").with_children(["a", "b", "c"].map(|k| h("li").with_key(k).text(k))))
        .child(text("tail"));

    for config in [PatchConfig::default(), PatchConfig::keyed(), PatchConfig::by_content()] {
        let (mut host, root, old) = mounted(tree.clone());
        let before = render_html(&host, root);
        let live = host.live_count();

        let mut reconciler = Reconciler::with_config(&mut host, config);
        let committed = reconciler.patch(old, tree.clone().into(), root).unwrap();
        let stats = reconciler.stats();

        assert!(stats.is_empty(), "{stats:?}");
        assert!(host.mutations().is_empty(), "{:?}", host.mutations());
        assert_eq!(render_html(&host, root), before);
        assert_eq!(host.live_count(), live);
        assert!(committed.is_mounted());
    }
}

#[test]
fn test_repeated_patches_track_listeners() {
    let clicks = Arc::new(AtomicUsize::new(0));
    let view = |n: usize| -> Node {
        let clicks = Arc::clone(&clicks);
        h("button")
            .on("click", Handler::new(move |_| {
                clicks.fetch_add(n, Ordering::SeqCst);
            }))
            .text(n.to_string())
            .into()
    };

    let (mut host, root, mut tree) = mounted(view(1));
    let button = tree.host_id().unwrap();
    for n in 2..=4 {
        tree = patch(tree, view(n), root, &mut host).unwrap();
        assert_eq!(host.listener_count(button, "click"), 1);
    }

    host.fire(button, "click");
    assert_eq!(clicks.load(Ordering::SeqCst), 4);

    destroy(&mut tree, &mut host).unwrap();
    assert_eq!(host.live_count(), 1);
    assert!(host.mutations().iter().any(|m| matches!(m, Mutation::RemoveListener { .. })));
}

#[test]
fn test_keyed_list_shuffle() {
    let list = |keys: &[&str]| -> Node {
        h("ol")
            .with_children(keys.iter().map(|k| h("li").with_key(*k).attr("data-id", *k).text(*k)))
            .into()
    };

    let mut host = MemoryHost::new();
    let root = host.create_root("body");
    let mut tree = list(&["a", "b", "c", "d", "e"]);
    mount(&mut tree, root, None, &mut host).unwrap();
    let ol = tree.host_id().unwrap();
    let id_of = |host: &MemoryHost, key: &str| {
        host.children(ol)
            .iter()
            .copied()
            .find(|&id| host.attribute(id, "data-id").and_then(AttrValue::as_str) == Some(key))
    };
    let d = id_of(&host, "d").unwrap();
    let b = id_of(&host, "b").unwrap();

    let steps: [&[&str]; 4] = [&["e", "d", "c", "b", "a"], &["d", "x", "b"], &["b", "d", "y", "x"], &[]];
    for keys in steps {
        tree = patch_with_config(tree, list(keys), root, &mut host, PatchConfig::keyed()).unwrap();
        assert_eq!(host.text_content(ol), keys.concat());
        assert_eq!(host.children(ol).len(), keys.len());
        assert!(tree.children().iter().all(Node::is_mounted));

        // Surviving keys keep their host nodes
        for (i, key) in keys.iter().enumerate() {
            match *key {
                "d" => assert_eq!(host.children(ol)[i], d),
                "b" => assert_eq!(host.children(ol)[i], b),
                _ => {}
            }
        }
    }

    assert_eq!(host.live_count(), 2);
}

#[test]
fn test_keyed_identity_survives_reorder() {
    let list = |keys: &[&str]| -> Node {
        h("ol").with_children(keys.iter().map(|k| h("li").with_key(*k).text(*k))).into()
    };

    let mut host = MemoryHost::new();
    let root = host.create_root("body");
    let mut tree = list(&["a", "b", "c"]);
    mount(&mut tree, root, None, &mut host).unwrap();
    let before: Vec<HostId> = tree.children().iter().filter_map(Node::host_id).collect();

    let tree = patch_with_config(tree, list(&["c", "b", "a"]), root, &mut host, PatchConfig::keyed()).unwrap();
    let after: Vec<HostId> = tree.children().iter().filter_map(Node::host_id).collect();
    assert_eq!(after, [before[2], before[1], before[0]]);
}

#[test]
fn test_nested_fragments() {
    let view = |items: &[&str], footer: bool| -> Node {
        let mut div = h("div")
            .child(text("["))
            .child(fragment(items.iter().map(|i| fragment([text(*i)]))));
        if footer {
            div = div.child(h("footer"));
        }
        div.child(text("]")).into()
    };

    let (mut host, root, tree) = mounted(view(&["a", "b"], false));
    let div = tree.host_id().unwrap();

    let tree = patch(tree, view(&["a", "b", "c"], true), root, &mut host).unwrap();
    assert_eq!(render_html(&host, div), "<div>[abc<footer></footer>]</div>");

    let tree = patch(tree, view(&[], false), root, &mut host).unwrap();
    assert_eq!(render_html(&host, div), "<div>[]</div>");

    let tree = patch(tree, view(&["z"], false), root, &mut host).unwrap();
    assert_eq!(host.text_content(div), "[z]");
    assert_eq!(tree.children()[1].as_fragment().and_then(|f| f.container), Some(div));
}

#[test]
fn test_text_element_swap_at_root_position() {
    let (mut host, root, tree) = mounted(fragment([Node::from("a"), h("hr").into(), Node::from("b")]));
    let tree = patch(tree, fragment([Node::from("a"), Node::from("-"), Node::from("b")]).into(), root, &mut host).unwrap();
    assert_eq!(render_html(&host, root), "<body>a-b</body>");

    patch(tree, fragment([h("i").text("a"), h("hr"), h("i").text("b")]).into(), root, &mut host).unwrap();
    assert_eq!(render_html(&host, root), "<body><i>a</i><hr /><i>b</i></body>");
}

#[test]
fn test_conditional_child_toggle() {
    let view = |open: bool| -> Node {
        h("details")
            .attr("open", open)
            .child(h("summary").text("More"))
            .child(open.then(|| h("p").text("body")))
            .child(h("footer"))
            .into()
    };
    let closed = "<body><details><summary>More</summary><footer></footer></details></body>";

    let (mut host, root, tree) = mounted(view(false));
    let details = tree.host_id().unwrap();
    assert_eq!(tree.children().len(), 2);
    assert_eq!(render_html(&host, root), closed);

    let tree = patch(tree, view(true), root, &mut host).unwrap();
    assert_eq!(tree.children().len(), 3);
    assert_eq!(
        render_html(&host, root),
        "<body><details open><summary>More</summary><p>body</p><footer></footer></details></body>"
    );

    let tree = patch(tree, view(false), root, &mut host).unwrap();
    assert_eq!(tree.host_id(), Some(details));
    assert_eq!(host.children(details).len(), 2);
    assert_eq!(render_html(&host, root), closed);
}

#[test]
fn test_app_counter() {
    let mut host = MemoryHost::new();
    let root = host.create_root("body");

    let mut app: App<i64, i64, MemoryHost> = App::new(
        0,
        |count: &i64, emit: &Emitter<i64>| {
            let inc = emit.clone();
            let dec = emit.clone();
            h("div")
                .child(h("button").on("click", Handler::new(move |_| dec.emit("add", -1))).text("-"))
                .child(h("span").text(count.to_string()))
                .child(h("button").on("click", Handler::new(move |_| inc.emit("add", 1))).text("+"))
                .into()
        },
        host,
        root,
    )
    .with_reducer("add", |count: &i64, delta: &i64| count + delta);

    app.mount().unwrap();
    let buttons: Vec<HostId> = app.host().children(app.vdom().unwrap().host_id().unwrap()).to_vec();
    let (minus, plus) = (buttons[0], buttons[2]);

    app.host().fire(plus, "click");
    app.host().fire(plus, "click");
    app.host().fire(minus, "click");
    assert_eq!(app.flush().unwrap(), 3);

    assert_eq!(*app.state(), 1);
    assert_eq!(render_html(app.host(), root), "<body><div><button>-</button><span>1</span><button>+</button></div></body>");

    assert!(!app.dispatch("reset", 0).unwrap());
    app.unmount().unwrap();
    assert!(app.host().children(root).is_empty());
}
