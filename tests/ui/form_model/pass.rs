use folio_contact::form::{FieldLens, FormModel};

#[derive(Clone, folio_contact::form::FormModel)]
struct InquiryForm {
    reply_to: String,
    topic: String,
}

fn main() {
    let fields = InquiryForm::fields();
    let lens = fields.reply_to();
    let mut model = InquiryForm {
        reply_to: "ana@example.com".to_string(),
        topic: String::new(),
    };
    lens.set(&mut model, "juan@example.com".to_string());
    assert_eq!(lens.key().as_str(), "reply_to");
    assert_eq!(lens.get(&model), "juan@example.com");
    assert_eq!(
        InquiryFormFields::KEYS.map(|key| key.as_str()),
        ["reply_to", "topic"]
    );
    assert_eq!(InquiryForm::field_keys().len(), 2);
    assert!(model.topic.is_empty());
}
