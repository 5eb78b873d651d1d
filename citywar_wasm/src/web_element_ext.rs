use crate::web_document::WebDocument;
use crate::web_error_handling::JsResult;


pub trait WebElementExt {
    fn with_id(self, value: &str) -> web_sys::Element;
    fn with_text_content(self, text: &str) -> web_sys::Element;
    fn with_classes(self, classes: impl IntoIterator<Item = &str>) -> JsResult<web_sys::Element>;

    fn remove_all_children(&self);
    fn append_new_element(&self, doc: &WebDocument, local_name: &str) -> JsResult<web_sys::Element>;
    fn append_text_span(
        &self, doc: &WebDocument, text: &str, classes: impl IntoIterator<Item = &str>,
    ) -> JsResult<()>;

    // Sets `class` on the element iff `on` is true.
    fn set_class(&self, class: &str, on: bool) -> JsResult<()>;
}

impl WebElementExt for web_sys::Element {
    fn with_id(self, value: &str) -> web_sys::Element {
        self.set_id(value);
        self
    }

    fn with_text_content(self, text: &str) -> web_sys::Element {
        self.set_text_content(Some(text));
        self
    }

    fn with_classes(self, classes: impl IntoIterator<Item = &str>) -> JsResult<web_sys::Element> {
        for class in classes {
            self.class_list().add_1(class)?;
        }
        Ok(self)
    }

    fn remove_all_children(&self) { self.replace_children_with_node_0() }

    fn append_new_element(&self, doc: &WebDocument, local_name: &str) -> JsResult<web_sys::Element> {
        let node = doc.create_element(local_name)?;
        self.append_child(&node)?;
        Ok(node)
    }

    fn append_text_span(
        &self, doc: &WebDocument, text: &str, classes: impl IntoIterator<Item = &str>,
    ) -> JsResult<()> {
        let span = self.append_new_element(doc, "span")?.with_classes(classes)?;
        span.set_text_content(Some(text));
        Ok(())
    }

    fn set_class(&self, class: &str, on: bool) -> JsResult<()> {
        self.class_list().toggle_with_force(class, on)?;
        Ok(())
    }
}
