//! Integration tests driving the whole pipeline from C# sources

use implgen::{CancellationToken, CollectingSink, Config, GenerationReport, Generator, SourceFile};

fn generate(files: &[(&str, &str)]) -> (GenerationReport, CollectingSink) {
    generate_with(Config::default(), files)
}

fn generate_with(config: Config, files: &[(&str, &str)]) -> (GenerationReport, CollectingSink) {
    let sources: Vec<SourceFile> = files
        .iter()
        .map(|(path, text)| SourceFile::new(*path, *text))
        .collect();
    let mut generator = Generator::new(config).unwrap();
    let mut sink = CollectingSink::new();
    let report = generator
        .run(&sources, &mut sink, &CancellationToken::new())
        .unwrap();
    (report, sink)
}

const GREETER: &str = r#"
using System.Threading.Tasks;

namespace Demo.Contracts
{
    public interface IGreeter
    {
        Task<string> greet(string name);
    }

    public interface IFarewell
    {
        Task say();
    }

    public interface IGreeterToo
    {
        Task say();
    }
}
"#;

#[test]
fn test_greeter_unit_is_complete() {
    let widget = r#"
using Demo.Contracts;

namespace Demo;

[AddImplementation<IGreeter>]
public partial class Widget { }
"#;
    let (report, sink) = generate(&[("Contracts.cs", GREETER), ("Widget.cs", widget)]);
    assert_eq!(report.units.len(), 1);
    assert!(report.units[0].is_success());

    assert_eq!(
        sink.get("Demo.Widget.g.cs").unwrap(),
        "#nullable enable\n\
         \n\
         using Demo.Contracts;\n\
         using System.Threading.Tasks;\n\
         \n\
         namespace Demo;\n\
         \n\
         partial class Widget : IGreeter\n\
         {\n\
         \x20   async Task<string> IGreeter.greet(string name)\n\
         \x20   {\n\
         \x20       return default;\n\
         \x20   }\n\
         }\n"
    );
}

#[test]
fn test_same_member_on_two_interfaces_gives_two_stubs() {
    let widget = r#"
namespace Demo;

[AddImplementation<Demo.Contracts.IFarewell>]
[AddImplementation<Demo.Contracts.IGreeterToo>]
public partial class Widget { }
"#;
    let (_, sink) = generate(&[("Contracts.cs", GREETER), ("Widget.cs", widget)]);
    let unit = sink.get("Demo.Widget.g.cs").unwrap();

    assert!(unit.contains("partial class Widget : IFarewell, IGreeterToo"));
    assert!(unit.contains("async Task IFarewell.say()\n    {\n        return;\n    }"));
    assert!(unit.contains("async Task IGreeterToo.say()\n    {\n        return;\n    }"));
}

#[test]
fn test_implements_clause_keeps_order_and_duplicates() {
    let widget = r#"
using Demo.Contracts;

namespace Demo;

[AddImplementation<IFarewell>, AddImplementation<IGreeter>]
[AddImplementation<IFarewell>]
public partial class Widget { }
"#;
    let (_, sink) = generate(&[("Contracts.cs", GREETER), ("Widget.cs", widget)]);
    assert!(
        sink.get("Demo.Widget.g.cs")
            .unwrap()
            .contains("partial class Widget : IFarewell, IGreeter, IFarewell\n")
    );
}

#[test]
fn test_parameters_and_return_types_are_reproduced() {
    let source = r#"
using System.Collections.Generic;
using System.Threading;
using System.Threading.Tasks;

namespace Shop;

public record Customer(string Name);

public interface ICustomers
{
    Task<IReadOnlyList<Customer>> Search(string? term, int limit = 10, CancellationToken token = default);
    Task<T> Find<T>(ref int cursor, out string next);
    ValueTask Touch();
}

[AddImplementation<ICustomers>]
public partial record CustomerService;
"#;
    let (report, sink) = generate(&[("Shop.cs", source)]);
    assert!(report.units[0].is_success());

    let unit = sink.get("Shop.CustomerService.g.cs").unwrap();
    assert!(unit.contains("partial record CustomerService : ICustomers"));
    assert!(unit.contains(
        "async Task<IReadOnlyList<Customer>> ICustomers.Search(string? term, int limit = 10, \
         CancellationToken token = default)"
    ));
    assert!(unit.contains("async Task<T> ICustomers.Find<T>(ref int cursor, out string next)"));
    assert!(unit.contains("async ValueTask ICustomers.Touch()\n    {\n        return;\n    }"));

    // Sorted and deduplicated
    let usings: Vec<&str> = unit.lines().filter(|l| l.starts_with("using ")).collect();
    assert_eq!(
        usings,
        vec![
            "using Shop;",
            "using System.Collections.Generic;",
            "using System.Threading;",
            "using System.Threading.Tasks;",
        ]
    );
}

#[test]
fn test_malformed_interface_does_not_affect_other_units() {
    let source = r#"
using System.Threading.Tasks;

namespace Demo;

public interface IGood
{
    Task Run();
}

public class NotAnInterface { }

[AddImplementation<IGood>]
public partial class First { }

[AddImplementation<NotAnInterface>]
public partial class Second { }

[AddImplementation<IGood>]
public partial class Third { }
"#;
    let (report, sink) = generate(&[("Demo.cs", source)]);
    assert_eq!(
        sink.identifiers(),
        vec!["Demo.First.g.cs", "Demo.Second.g.cs", "Demo.Third.g.cs"]
    );
    assert!(report.units[0].is_success());
    assert!(report.units[1].is_degenerate());
    assert!(report.units[2].is_success());
    assert_eq!(
        sink.get("Demo.First.g.cs").unwrap().replace("First", "Third"),
        sink.get("Demo.Third.g.cs").unwrap()
    );

    let second = sink.get("Demo.Second.g.cs").unwrap();
    assert!(second.starts_with("/*\n"));
    assert!(second.contains("NotAnInterface is not an interface"));
    assert!(!second.contains("partial class"));
}

#[test]
fn test_non_task_member_becomes_comment_inside_unit() {
    let source = r#"
using System.Threading.Tasks;

namespace Demo;

public interface IMixed
{
    Task Start();
    int Count();
    int[] Samples(int window);
    Task Stop();
}

[AddImplementation<IMixed>]
public partial struct Engine { }
"#;
    let (report, sink) = generate(&[("Demo.cs", source)]);
    let unit = sink.get("Demo.Engine.g.cs").unwrap();
    assert_eq!(report.units[0].diagnostics.len(), 1);
    assert!(unit.contains("partial struct Engine : IMixed"));
    assert!(unit.contains("async Task IMixed.Start()"));
    assert!(unit.contains("async int IMixed.Count()\n    {\n        return;\n    }"));
    assert!(unit.contains(
        "    /*\n    Method Samples must have a Task return type\n"
    ));
    assert!(unit.contains(
        "    */\n    int[] IMixed.Samples(int window)\n    {\n        return;\n    }"
    ));
    assert!(unit.contains("async Task IMixed.Stop()"));

    let config = Config {
        allow_synchronous_members: true,
        ..Config::default()
    };
    let (report, sink) = generate_with(config, &[("Demo.cs", source)]);
    assert!(report.units[0].is_success());
    let unit = sink.get("Demo.Engine.g.cs").unwrap();
    assert!(unit.contains("int IMixed.Count()\n    {\n        return default;\n    }"));
    assert!(!unit.contains("async int"));
    assert!(
        unit.contains("int[] IMixed.Samples(int window)\n    {\n        return default;\n    }")
    );
}

#[test]
fn test_tuple_results_and_void_members() {
    let source = r#"
using System.Threading.Tasks;

namespace Demo;

public interface IPairs
{
    Task<(int Id, string Name)> Load();
    void Ping();
}

[AddImplementation<IPairs>]
partial class Widget { }
"#;
    let (report, sink) = generate(&[("Demo.cs", source)]);
    assert!(report.units[0].is_success());
    let unit = sink.get("Demo.Widget.g.cs").unwrap();
    assert!(unit.contains(
        "    async Task<(int Id, string Name)> IPairs.Load()\n    {\n        return default;\n    }"
    ));
    assert!(unit.contains("    async void IPairs.Ping()\n    {\n        return;\n    }"));
}

#[test]
fn test_generic_nested_type_identifier_and_containers() {
    let source = r#"
using System.Threading.Tasks;

namespace Demo.Outer;

public interface IHandler<TMessage>
{
    Task Handle(TMessage message);
}

public static partial class Handlers
{
    [AddImplementation<IHandler<T>>]
    public partial class Handler<T> { }
}
"#;
    let (_, sink) = generate(&[("Handlers.cs", source)]);
    assert_eq!(sink.identifiers(), vec!["Demo.Outer.Handlers.Handler[T].g.cs"]);

    let unit = sink.get("Demo.Outer.Handlers.Handler[T].g.cs").unwrap();
    assert!(unit.contains(
        "namespace Demo.Outer;\n\npartial class Handlers\n{\n    partial class Handler<T> : IHandler<T>\n"
    ));
    assert!(unit.contains("async Task IHandler<T>.Handle(T message)"));
}

#[test]
fn test_inherited_members_use_declaring_interface() {
    let source = r#"
using System;
using System.Threading.Tasks;
using Data;

namespace Data
{
    public interface IRepository<TEntity>
    {
        Task<TEntity> Get(Guid id);
    }
}

namespace Shop
{
    public class Order { }

    public interface IOrders : IRepository<Order>
    {
        Task Cancel(Guid id);
    }

    [AddImplementation<IOrders>]
    public partial class OrderStore { }
}
"#;
    let (report, sink) = generate(&[("Shop.cs", source)]);
    assert!(report.units[0].is_success());
    let unit = sink.get("Shop.OrderStore.g.cs").unwrap();
    assert!(unit.contains("async Task IOrders.Cancel(Guid id)"));
    assert!(unit.contains("async Task<Order> IRepository<Order>.Get(Guid id)"));
    assert!(unit.contains("using Data;\n"));
    assert!(unit.contains("using System;\n"));
}

#[test]
fn test_partial_declarations_produce_one_unit() {
    let first = r#"
using Demo.Contracts;
namespace Demo;

[AddImplementation<IGreeter>]
public partial class Widget { }
"#;
    let second = r#"
using Demo.Contracts;
namespace Demo;

[AddImplementation<IFarewell>]
public partial class Widget { }
"#;
    let (report, sink) = generate(&[
        ("Contracts.cs", GREETER),
        ("Widget.A.cs", first),
        ("Widget.B.cs", second),
    ]);
    assert_eq!(report.candidates, 2);
    assert_eq!(sink.len(), 1);
    assert!(
        sink.get("Demo.Widget.g.cs")
            .unwrap()
            .contains("partial class Widget : IGreeter, IFarewell")
    );
}

#[test]
fn test_bare_marker_and_global_namespace() {
    let source = r#"
[AddImplementation]
public partial class Loose { }
"#;
    let (_, sink) = generate(&[("Loose.cs", source)]);
    assert_eq!(
        sink.get("Loose.g.cs").unwrap(),
        "#nullable enable\n\npartial class Loose\n{\n}\n"
    );
}

#[test]
fn test_runs_are_idempotent() {
    let widget = r#"
using Demo.Contracts;
namespace Demo;

[AddImplementation<IGreeter>, AddImplementation<IFarewell>]
public partial class Widget { }

[AddImplementation<IMissing>]
public partial class Broken { }
"#;
    let files = [("Contracts.cs", GREETER), ("Widget.cs", widget)];
    let (_, first) = generate(&files);
    let (_, second) = generate(&files);
    assert_eq!(first.into_map(), second.into_map());
}

#[test]
fn test_json_declaration_model_feeds_the_pipeline() {
    let model = implgen::SourceModel::from_json_str(
        r#"{
  "declarations": [
    {
      "kind": "interface",
      "name": "IClock",
      "namespace": "Time",
      "members": [
        { "kind": "method", "name": "Now", "return_type": "Task<DateTime>" }
      ]
    },
    {
      "kind": "class",
      "name": "Clock",
      "namespace": "Time",
      "attributes": [ { "name": "AddImplementation", "type_arguments": ["IClock"] } ]
    }
  ]
}"#,
    )
    .unwrap();
    let semantic = implgen::SemanticModel::new(model);
    let mut generator = Generator::new(Config::default()).unwrap();
    let mut sink = CollectingSink::new();
    generator.generate_into(&semantic, &mut sink, &CancellationToken::new());

    let unit = sink.get("Time.Clock.g.cs").unwrap();
    assert!(unit.contains("async Task<DateTime> IClock.Now()"));
    assert!(unit.contains("using System;\n"));
}

#[test]
fn test_disk_cache_survives_new_generator() {
    let temp = tempfile::TempDir::new().unwrap();
    let config = Config {
        cache: implgen::config::CacheConfig {
            dir: Some(temp.path().join("cache")),
            ..Default::default()
        },
        ..Config::default()
    };
    let files = [("Contracts.cs", GREETER), (
        "Widget.cs",
        "namespace Demo; [AddImplementation<Demo.Contracts.IGreeter>] partial class Widget { }",
    )];

    let (first, _) = generate_with(config.clone(), &files);
    let (second, sink) = generate_with(config, &files);
    assert_eq!(first.cache_hits, 0);
    assert_eq!(second.cache_hits, 1);
    assert_eq!(first.units, second.units);
    assert!(sink.get("Demo.Widget.g.cs").is_some());

    let report = serde_json::to_value(&second).unwrap();
    assert_eq!(report["cache_hits"], 1);
    assert_eq!(report["emission"]["emitted"][0], "Demo.Widget.g.cs");
}
