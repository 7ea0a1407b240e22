//! End-to-end exercises of the public surface: factory to writer to sink,
//! the event adapter, tree building, and the attribute cursor feeding
//! serialization.

#![allow(clippy::unwrap_used)]

use std::fs;

use staxide::{
    Attribute, AttributeCollection, EventWriter, OutputError, OutputTarget, PrebuiltWriter,
    ResultTarget, StreamResult, TreeBuilder, WriterFactory, XmlEvent,
};

#[test]
fn full_document_to_byte_sink() {
    let mut buf: Vec<u8> = Vec::new();
    {
        let mut factory = WriterFactory::new();
        let mut writer = factory
            .create_writer(OutputTarget::bytes(&mut buf), None)
            .unwrap();
        writer.write_start_document(Some("1.0"), Some(true)).unwrap();
        writer.write_start_element("library").unwrap();
        writer.write_attribute("city", "Basel").unwrap();
        writer.write_start_element("book").unwrap();
        writer.write_attribute("title", "R&D \"notes\"").unwrap();
        writer.write_characters("4 < 5").unwrap();
        writer.write_end_element().unwrap();
        writer.write_comment(" closing time ").unwrap();
        writer.write_end_document().unwrap();
    }
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "<?xml version=\"1.0\" standalone=\"yes\"?>\n\
         <library city=\"Basel\">\
         <book title=\"R&amp;D &quot;notes&quot;\">4 &lt; 5</book>\
         <!-- closing time -->\
         </library>"
    );
}

#[test]
fn full_document_to_char_sink() {
    let mut buf = String::new();
    {
        let mut factory = WriterFactory::new();
        let mut writer = factory
            .create_writer(OutputTarget::chars(&mut buf), None)
            .unwrap();
        writer.write_start_element("note").unwrap();
        writer.write_cdata("a < b").unwrap();
        writer
            .write_processing_instruction("pager", Some("page=\"3\""))
            .unwrap();
        writer.write_end_document().unwrap();
    }
    assert_eq!(
        buf,
        "<note><![CDATA[a < b]]><?pager page=\"3\"?></note>"
    );
}

#[test]
fn system_id_target_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.xml");
    let system_id = path.to_str().unwrap().to_string();
    {
        let mut factory = WriterFactory::new();
        let target = OutputTarget::Result(ResultTarget::Stream(StreamResult::from_system_id(
            system_id.as_str(),
        )));
        let mut writer = factory.create_writer(target, None).unwrap();
        writer.write_start_element("saved").unwrap();
        writer.write_characters("on disk").unwrap();
        writer.write_end_document().unwrap();
    }
    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, "<saved>on disk</saved>");
}

#[test]
fn unopenable_system_id_reports_construction_failure() {
    let mut factory = WriterFactory::new();
    let target = OutputTarget::Result(ResultTarget::Stream(StreamResult::from_system_id(
        "/no-such-dir/deeply/out.xml",
    )));
    let err = factory.create_writer(target, None).unwrap_err();
    assert!(matches!(err, OutputError::WriterConstruction(_)));
}

#[test]
fn event_writer_builds_same_document() {
    let mut buf = String::new();
    {
        let mut factory = WriterFactory::new();
        let mut events = factory
            .create_event_writer(OutputTarget::chars(&mut buf), None)
            .unwrap();

        let mut attrs = AttributeCollection::new();
        attrs.set(Attribute::new("lang", "en"));

        let sequence = vec![
            XmlEvent::StartDocument {
                version: None,
                standalone: None,
            },
            XmlEvent::StartElement {
                qname: "p".to_string(),
                attributes: attrs,
            },
            XmlEvent::Characters("hello".to_string()),
            XmlEvent::EndElement,
            XmlEvent::EndDocument,
        ];
        for event in sequence {
            events.add_event(event).unwrap();
        }
    }
    assert_eq!(buf, "<?xml version=\"1.0\"?>\n<p lang=\"en\">hello</p>");
}

struct RecordingTree {
    calls: Vec<String>,
}

impl TreeBuilder for &mut RecordingTree {
    fn start_element(&mut self, qname: &str) {
        self.calls.push(format!("<{qname}>"));
    }
    fn attribute(&mut self, qname: &str, value: &str) {
        self.calls.push(format!("@{qname}={value}"));
    }
    fn text(&mut self, content: &str) {
        self.calls.push(format!("'{content}'"));
    }
    fn comment(&mut self, content: &str) {
        self.calls.push(format!("<!--{content}-->"));
    }
    fn processing_instruction(&mut self, target: &str, _data: Option<&str>) {
        self.calls.push(format!("<?{target}?>"));
    }
    fn end_element(&mut self) {
        self.calls.push("</>".to_string());
    }
}

#[test]
fn tree_target_dispatches_into_builder() {
    let mut tree = RecordingTree { calls: Vec::new() };
    {
        let mut factory = WriterFactory::new();
        let target = OutputTarget::Result(ResultTarget::Tree(Box::new(&mut tree)));
        let mut writer = factory.create_writer(target, None).unwrap();
        writer.write_start_document(None, None).unwrap(); // no-op for trees
        writer.write_start_element("root").unwrap();
        writer.write_attribute("id", "r1").unwrap();
        writer.write_start_element("child").unwrap();
        writer.write_characters("leaf").unwrap();
        writer.write_end_document().unwrap();
    }
    assert_eq!(
        tree.calls,
        vec!["<root>", "@id=r1", "<child>", "'leaf'", "</>", "</>"]
    );
}

#[test]
fn prebuilt_writer_round_trips_through_factory() {
    let mut buf = String::new();
    {
        let mut factory = WriterFactory::new();
        let writer = factory
            .create_writer(OutputTarget::chars(&mut buf), None)
            .unwrap();
        let target =
            OutputTarget::Result(ResultTarget::Prebuilt(PrebuiltWriter::from_stream(writer)));
        let mut events: EventWriter<'_> = factory.create_event_writer(target, None).unwrap();
        events
            .add_event(XmlEvent::StartElement {
                qname: "x".to_string(),
                attributes: AttributeCollection::new(),
            })
            .unwrap();
        events.add_event(XmlEvent::EndDocument).unwrap();
    }
    assert_eq!(buf, "<x/>");
}

#[test]
fn cursor_filtered_attributes_serialize_in_order() {
    let mut attrs = AttributeCollection::new();
    attrs.set(Attribute::new("keep", "1"));
    attrs.set(Attribute::new("xmlns:tmp", "urn:tmp"));
    attrs.set(Attribute::new("also", "2"));

    // strip namespace declarations before writing
    let mut cursor = attrs.cursor();
    while cursor.has_next() {
        let is_decl = {
            let attr = cursor.advance().unwrap();
            attr.qname.starts_with("xmlns")
        };
        if is_decl {
            cursor.remove_last_returned().unwrap();
        }
    }
    drop(cursor);

    let mut buf = String::new();
    {
        let mut factory = WriterFactory::new();
        let mut writer = factory
            .create_writer(OutputTarget::chars(&mut buf), None)
            .unwrap();
        writer.write_start_element("e").unwrap();
        writer.write_attributes(&attrs).unwrap();
        writer.write_end_document().unwrap();
    }
    assert_eq!(buf, "<e keep=\"1\" also=\"2\"/>");
}

#[test]
fn property_surface_through_public_api() {
    let mut buf = String::new();
    {
        let mut factory = WriterFactory::new();
        factory.set_property("escapeCharacters", false).unwrap();
        let mut writer = factory
            .create_writer(OutputTarget::chars(&mut buf), None)
            .unwrap();
        writer.write_start_element("raw").unwrap();
        writer.write_characters("<b>bold</b>").unwrap();
        writer.write_end_document().unwrap();
    }
    assert_eq!(buf, "<raw><b>bold</b></raw>");

    let mut factory = WriterFactory::new();
    let err = factory.set_property("reuse-instance", true).unwrap_err();
    assert!(matches!(err, OutputError::InvalidPropertyValue { .. }));
    // disabling is accepted
    factory.set_property("reuse-instance", false).unwrap();
}

#[test]
fn recycled_writer_is_accepted_back() {
    // with reuse disabled (the only public configuration) recycling is
    // still legal; the factory just constructs fresh writers afterwards
    let mut first = String::new();
    let mut second = String::new();
    {
        let mut factory = WriterFactory::new();
        let mut writer = factory
            .create_writer(OutputTarget::chars(&mut first), None)
            .unwrap();
        writer.write_start_element("a").unwrap();
        writer.write_end_document().unwrap();
        factory.recycle(writer);
        let mut next = factory
            .create_writer(OutputTarget::chars(&mut second), None)
            .unwrap();
        next.write_start_element("b").unwrap();
        next.write_end_document().unwrap();
    }
    assert_eq!(first, "<a/>");
    assert_eq!(second, "<b/>");
}

#[test]
fn writer_flushes_to_io_sink() {
    struct CountingSink {
        flushes: u32,
    }
    impl std::io::Write for &mut CountingSink {
        fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
            Ok(data.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    let mut sink = CountingSink { flushes: 0 };
    {
        let mut factory = WriterFactory::new();
        let mut writer = factory
            .create_writer(OutputTarget::bytes(&mut sink), None)
            .unwrap();
        writer.write_start_element("r").unwrap();
        writer.write_end_document().unwrap(); // flushes
    }
    assert_eq!(sink.flushes, 1);
}
